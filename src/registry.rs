//! Named functions and constants visible to expressions.
//!
//! The table is built once, on first use, and never changes afterwards. It is
//! the only namespace an expression can reach.

use crate::error::MathError;
use crate::value::Value;
use foldhash::{HashMap, HashMapExt};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use std::f64::consts::{E, PI, TAU};
use std::sync::LazyLock;

const DOMAIN: &str = "math domain error";
const NAN_TO_INT: &str = "cannot convert float NaN to integer";
const FACTORIAL_DOMAIN: &str = "Factorial is only defined for non-negative integers.";

/// Largest n for which n! is a finite f64.
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Clone, Copy)]
enum Native {
    Unary(fn(f64) -> Result<f64, MathError>),
    /// Real arguments, count checked against the function's arity.
    Variadic(fn(&[f64]) -> Result<f64, MathError>),
    /// Sees the raw values, complex ones included.
    Values(fn(&[Value]) -> Result<f64, MathError>),
}

/// A registered function: name, accepted argument count and implementation.
#[derive(Clone, Copy)]
pub struct Function {
    name: &'static str,
    min_args: usize,
    max_args: usize,
    /// Names keyword arguments bind to. Empty for positional-only functions.
    params: &'static [&'static str],
    native: Native,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("params", &self.params)
            .finish()
    }
}

impl Function {
    const fn unary(name: &'static str, f: fn(f64) -> Result<f64, MathError>) -> Self {
        Self {
            name,
            min_args: 1,
            max_args: 1,
            params: &[],
            native: Native::Unary(f),
        }
    }

    const fn variadic(
        name: &'static str,
        min_args: usize,
        max_args: usize,
        f: fn(&[f64]) -> Result<f64, MathError>,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args,
            params: &[],
            native: Native::Variadic(f),
        }
    }

    const fn values(name: &'static str, f: fn(&[Value]) -> Result<f64, MathError>) -> Self {
        Self {
            name,
            min_args: 1,
            max_args: 1,
            params: &[],
            native: Native::Values(f),
        }
    }

    /// Let arguments be passed by name as well as by position.
    const fn named(mut self, params: &'static [&'static str]) -> Self {
        self.params = params;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn positional_only(&self) -> bool {
        self.params.is_empty()
    }

    pub fn accepts(&self, argc: usize) -> bool {
        (self.min_args..=self.max_args).contains(&argc)
    }

    /// Apply the function to real arguments.
    pub fn call(&self, args: &[f64]) -> Result<f64, MathError> {
        let values: Vec<Value> = args.iter().copied().map(Value::Real).collect();
        self.call_values(&values)
    }

    /// Apply the function to positional values plus `name=value` keywords.
    pub(crate) fn call_with(
        &self,
        args: &[Value],
        keywords: &[(&str, Value)],
    ) -> Result<f64, MathError> {
        if keywords.is_empty() {
            return self.call_values(args);
        }
        let bound = self.bind(args, keywords)?;
        self.call_values(&bound)
    }

    /// Fill parameters from positions, then from keywords. Unknown names,
    /// a parameter given twice, or a gap before a given parameter fail.
    fn bind(&self, args: &[Value], keywords: &[(&str, Value)]) -> Result<Vec<Value>, MathError> {
        if args.len() > self.params.len() {
            return Err(MathError::Argument);
        }
        let mut slots: Vec<Option<Value>> = args.iter().copied().map(Some).collect();
        slots.resize(self.params.len(), None);
        for &(name, value) in keywords {
            let i = self
                .params
                .iter()
                .position(|p| *p == name)
                .ok_or(MathError::Argument)?;
            if slots[i].replace(value).is_some() {
                return Err(MathError::Argument);
            }
        }
        // trailing parameters may be left to their defaults
        let given = slots.iter().take_while(|s| s.is_some()).count();
        if slots[given..].iter().any(Option::is_some) {
            return Err(MathError::Argument);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    pub(crate) fn call_values(&self, args: &[Value]) -> Result<f64, MathError> {
        if !self.accepts(args.len()) {
            return Err(MathError::Argument);
        }
        match self.native {
            Native::Values(f) => f(args),
            Native::Unary(f) => f(real(&args[0])?),
            Native::Variadic(f) => {
                let reals = args.iter().map(real).collect::<Result<Vec<_>, _>>()?;
                f(&reals)
            }
        }
    }
}

fn real(v: &Value) -> Result<f64, MathError> {
    match v {
        Value::Real(x) => Ok(*x),
        _ => Err(MathError::Argument),
    }
}

/// What a name resolves to.
#[derive(Clone, Copy, Debug)]
pub enum Entry {
    Function(Function),
    Constant(f64),
}

const FUNCTIONS: &[Function] = &[
    Function::unary("sin", |x| math1(x, f64::sin, false)),
    Function::unary("cos", |x| math1(x, f64::cos, false)),
    Function::unary("tan", |x| math1(x, f64::tan, false)),
    Function::unary("asin", |x| math1(x, f64::asin, false)),
    Function::unary("acos", |x| math1(x, f64::acos, false)),
    Function::unary("atan", |x| math1(x, f64::atan, false)),
    Function::unary("sin_deg", |x| math1(x.to_radians(), f64::sin, false)).named(&["x"]),
    Function::unary("cos_deg", |x| math1(x.to_radians(), f64::cos, false)).named(&["x"]),
    Function::unary("tan_deg", |x| math1(x.to_radians(), f64::tan, false)).named(&["x"]),
    Function::unary("asin_deg", |x| math1(x, f64::asin, false).map(f64::to_degrees)).named(&["x"]),
    Function::unary("acos_deg", |x| math1(x, f64::acos, false).map(f64::to_degrees)).named(&["x"]),
    Function::unary("atan_deg", |x| math1(x, f64::atan, false).map(f64::to_degrees)).named(&["x"]),
    Function::unary("sinh", |x| math1(x, f64::sinh, true)),
    Function::unary("cosh", |x| math1(x, f64::cosh, true)),
    Function::unary("tanh", |x| math1(x, f64::tanh, false)),
    Function::variadic("log", 1, 2, log),
    Function::variadic("ln", 1, 2, log),
    Function::unary("log10", |x| math1(x, f64::log10, false)),
    Function::unary("exp", |x| math1(x, f64::exp, true)),
    Function::unary("sqrt", |x| math1(x, f64::sqrt, false)),
    // x^(1/3) through pow: negative input is a domain error, not -cbrt(|x|).
    Function::unary("cbrt", |x| math_pow(x, 1.0 / 3.0)).named(&["x"]),
    Function::values("abs", abs),
    Function::unary("floor", |x| integral(x).map(f64::floor)),
    Function::unary("ceil", |x| integral(x).map(f64::ceil)),
    Function::variadic("round", 1, 2, round).named(&["number", "ndigits"]),
    Function::unary("deg", |x| Ok(x.to_degrees())),
    Function::unary("rad", |x| Ok(x.to_radians())),
    Function::unary("fact", factorial).named(&["x"]),
    Function::unary("factorial", factorial).named(&["x"]),
];

const CONSTANTS: &[(&str, f64)] = &[("pi", PI), ("e", E), ("tau", TAU)];

/// Wrap a one-argument libm function with domain/range checks: NaN out of a
/// non-NaN input is a domain error; an infinite result from a finite input is
/// an overflow when `can_overflow`, otherwise a domain error (`log(0)`).
fn math1(x: f64, f: fn(f64) -> f64, can_overflow: bool) -> Result<f64, MathError> {
    let r = f(x);
    if r.is_nan() && !x.is_nan() {
        return Err(MathError::Domain(DOMAIN));
    }
    if r.is_infinite() && x.is_finite() {
        return Err(if can_overflow {
            MathError::Overflow
        } else {
            MathError::Domain(DOMAIN)
        });
    }
    Ok(r)
}

/// `pow(x, y)` with domain errors instead of complex results.
fn math_pow(x: f64, y: f64) -> Result<f64, MathError> {
    let r = x.powf(y);
    if !x.is_finite() || !y.is_finite() {
        return Ok(r);
    }
    if r.is_nan() {
        return Err(MathError::Domain(DOMAIN));
    }
    if r.is_infinite() {
        return Err(if x == 0.0 {
            MathError::Domain(DOMAIN)
        } else {
            MathError::Overflow
        });
    }
    Ok(r)
}

fn log(args: &[f64]) -> Result<f64, MathError> {
    let num = math1(args[0], f64::ln, false)?;
    match args.get(1) {
        None => Ok(num),
        Some(&base) => {
            let den = math1(base, f64::ln, false)?;
            if den == 0.0 {
                return Err(MathError::DivisionByZero);
            }
            Ok(num / den)
        }
    }
}

fn abs(args: &[Value]) -> Result<f64, MathError> {
    match args[0] {
        Value::Real(x) => Ok(x.abs()),
        Value::Complex(z) => {
            let r = z.norm();
            if r.is_infinite() && z.is_finite() {
                return Err(MathError::Overflow);
            }
            Ok(r)
        }
        Value::Sequence => Err(MathError::Argument),
    }
}

/// Gate for functions whose result is an integer: NaN and infinities have no
/// integer value.
fn integral(x: f64) -> Result<f64, MathError> {
    if x.is_nan() {
        return Err(MathError::Domain(NAN_TO_INT));
    }
    if x.is_infinite() {
        return Err(MathError::Overflow);
    }
    Ok(x)
}

fn round(args: &[f64]) -> Result<f64, MathError> {
    let x = args[0];
    let Some(&ndigits) = args.get(1) else {
        return integral(x).map(f64::round_ties_even);
    };
    if !ndigits.is_finite() || ndigits.fract() != 0.0 {
        return Err(MathError::Argument);
    }
    if !x.is_finite() || x == 0.0 {
        return Ok(x);
    }
    // Past these bounds every finite double is already exact or rounds to zero.
    if ndigits > 323.0 {
        return Ok(x);
    }
    if ndigits < -308.0 {
        return Ok(0.0f64.copysign(x));
    }
    let digits = ndigits as i32;
    if digits >= 0 {
        // Formatting rounds the exact binary value, ties to even.
        let text = format!("{:.*}", digits as usize, x);
        return text.parse().map_err(|_| MathError::Argument);
    }
    let scale = 10f64.powi(-digits);
    let r = (x / scale).round_ties_even() * scale;
    if r.is_infinite() {
        return Err(MathError::Overflow);
    }
    Ok(r)
}

fn factorial(x: f64) -> Result<f64, MathError> {
    let x = integral(x)?;
    if x.trunc() != x || x < 0.0 {
        return Err(MathError::Domain(FACTORIAL_DOMAIN));
    }
    if x > MAX_FACTORIAL {
        return Err(MathError::Overflow);
    }
    let n = x as u32;
    let exact = (2..=n).fold(BigUint::one(), |acc, k| acc * k);
    exact.to_f64().ok_or(MathError::Overflow)
}

/// The fixed table of functions and constants.
pub struct Registry {
    entries: HashMap<&'static str, Entry>,
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// The process-wide registry.
pub fn registry() -> &'static Registry {
    &BUILTIN
}

impl Registry {
    fn builtin() -> Self {
        let mut entries = HashMap::with_capacity(FUNCTIONS.len() + CONSTANTS.len());
        for f in FUNCTIONS {
            entries.insert(f.name, Entry::Function(*f));
        }
        for &(name, value) in CONSTANTS {
            entries.insert(name, Entry::Constant(value));
        }
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        match self.lookup(name) {
            Some(Entry::Function(f)) => Some(f),
            _ => None,
        }
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        match self.lookup(name) {
            Some(Entry::Constant(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Function names, sorted.
    pub fn function_names(&self) -> Vec<&'static str> {
        self.sorted_names(|e| matches!(e, Entry::Function(_)))
    }

    /// Constant names, sorted.
    pub fn constant_names(&self) -> Vec<&'static str> {
        self.sorted_names(|e| matches!(e, Entry::Constant(_)))
    }

    fn sorted_names(&self, keep: fn(&Entry) -> bool) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .entries
            .iter()
            .filter(|(_, e)| keep(e))
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        names
    }
}
