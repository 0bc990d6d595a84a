use crate::ast::{Expr, Expression, Number, UnaryOperator};
use crate::error::{EvalError, MathError};
use crate::registry::{Entry, Function, Registry};
use crate::stack;
use crate::value::Value;
use log::debug;
use num_complex::Complex64;

/// What a call's callee evaluated to.
enum Callee<'r> {
    Function(&'r Function),
    NotCallable,
}

/// Tree-walking interpreter over a validated tree. Names resolve through the
/// registry and nowhere else.
pub(crate) struct Interpreter<'r> {
    registry: &'r Registry,
}

impl<'r> Interpreter<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub(crate) fn run(&self, root: &Expression) -> Result<Value, EvalError> {
        match root {
            Expression::Body(body) => self.eval(body),
            Expression::Assign { target, .. } => {
                debug!("assignment to '{}' is not evaluated", target);
                Err(EvalError::Invalid)
            }
        }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        stack::guarded(|| self.eval_node(expr))
    }

    fn eval_node(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Constant(Number::Real(v)) => Ok(Value::Real(*v)),
            Expr::Constant(Number::Imaginary(v)) => Ok(Value::Complex(Complex64::new(0.0, *v))),
            Expr::Name(name) => match self.registry.lookup(name) {
                Some(Entry::Constant(v)) => Ok(Value::Real(*v)),
                Some(Entry::Function(_)) => {
                    debug!("function '{}' used without a call", name);
                    Err(EvalError::Invalid)
                }
                None => {
                    debug!("unknown identifier '{}'", name);
                    Err(EvalError::Invalid)
                }
            },
            Expr::BinOp { .. } => {
                let (first, links) = expr.left_spine();
                let mut acc = self.eval(first)?;
                for (op, right) in links {
                    let rhs = self.eval(right)?;
                    acc = acc.binary(op, rhs)?;
                }
                Ok(acc)
            }
            Expr::UnaryOp { op, operand } => {
                let v = self.eval(operand)?;
                match op {
                    UnaryOperator::USub => v.negate(),
                    UnaryOperator::UAdd => v.plus(),
                    UnaryOperator::Invert | UnaryOperator::Not => Err(EvalError::Invalid),
                }
            }
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                let callee = self.callee(func)?;
                let values = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                let named = keywords
                    .iter()
                    .map(|kw| Ok((kw.name.as_deref(), self.eval(&kw.value)?)))
                    .collect::<Result<Vec<_>, EvalError>>()?;
                let f = match callee {
                    Callee::Function(f) => f,
                    Callee::NotCallable => {
                        debug!("call target is not a function");
                        return Err(EvalError::Invalid);
                    }
                };
                if !named.is_empty() && f.positional_only() {
                    debug!("'{}' does not take keyword arguments", f.name());
                    return Err(EvalError::Invalid);
                }
                let mut bound = Vec::with_capacity(named.len());
                for (name, value) in named {
                    let Some(name) = name else {
                        debug!("'{}' called with a ** argument", f.name());
                        return Err(EvalError::Invalid);
                    };
                    bound.push((name, value));
                }
                f.call_with(&values, &bound)
                    .inspect_err(|e| {
                        if *e == MathError::Argument {
                            debug!(
                                "'{}' rejected {} positional and {} keyword arguments",
                                f.name(),
                                values.len(),
                                bound.len()
                            );
                        }
                    })
                    .map(Value::Real)
                    .map_err(EvalError::from)
            }
            Expr::List(items) | Expr::Tuple(items) => {
                for item in items {
                    self.eval(item)?;
                }
                Ok(Value::Sequence)
            }
            other => {
                debug!("{} reached evaluation", other.kind());
                Err(EvalError::Invalid)
            }
        }
    }

    /// Resolve the callee before the arguments are evaluated, so an unknown
    /// function name fails before anything in its argument list does.
    fn callee(&self, func: &Expr) -> Result<Callee<'r>, EvalError> {
        if let Expr::Name(name) = func {
            return match self.registry.lookup(name) {
                Some(Entry::Function(f)) => Ok(Callee::Function(f)),
                Some(Entry::Constant(_)) => Ok(Callee::NotCallable),
                None => {
                    debug!("unknown function '{}'", name);
                    Err(EvalError::Invalid)
                }
            };
        }
        self.eval(func)?;
        Ok(Callee::NotCallable)
    }
}
