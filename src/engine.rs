use crate::error::EvalError;
use crate::interp::Interpreter;
use crate::parser::Parser;
use crate::registry::{registry, Registry};
use crate::validate::validate;
use crate::value::Value;

/// Evaluates expression strings against the built-in registry.
///
/// Holds no per-call state: one value can be shared freely between threads and
/// every call to [`evaluate`](Evaluator::evaluate) is independent.
///
/// ```
/// use scicalc::Evaluator;
///
/// let calc = Evaluator::new();
/// assert_eq!(calc.evaluate("2 + 3 * 4").unwrap(), 14.0);
/// assert_eq!(calc.evaluate("fact(5)").unwrap(), 120.0);
/// assert_eq!(calc.evaluate("1/0").unwrap_err().to_string(), "Division by zero.");
/// ```
#[derive(Clone, Copy)]
pub struct Evaluator {
    registry: &'static Registry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("names", &self.registry.len())
            .finish()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            registry: registry(),
        }
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Parse, check against the allowed node kinds, evaluate, and reduce the
    /// outcome to a real number.
    ///
    /// Non-finite results (`1e308 * 10`, `1e999 - 1e999`) are returned as they
    /// are; only complex results are refused.
    pub fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        if expression.is_empty() {
            return Err(EvalError::Empty);
        }
        let tree = Parser::new(expression)?.parse()?;
        validate(&tree)?;
        let value = Interpreter::new(self.registry).run(&tree)?;
        normalize(value)
    }
}

fn normalize(value: Value) -> Result<f64, EvalError> {
    match value {
        Value::Real(v) => Ok(v),
        Value::Complex(_) => Err(EvalError::ComplexResult),
        Value::Sequence => Err(EvalError::Invalid),
    }
}

/// Evaluate with the shared default [`Evaluator`].
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    Evaluator::new().evaluate(expression)
}
