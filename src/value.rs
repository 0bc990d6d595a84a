use crate::ast::BinOperator;
use crate::error::EvalError;
use num_complex::Complex64;

/// Runtime value of the interpreter.
///
/// Complex values exist only so they can be carried to the end and refused;
/// list and tuple displays evaluate to an inert `Sequence` that no operation
/// accepts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Value {
    Real(f64),
    Complex(Complex64),
    Sequence,
}

impl Value {
    pub(crate) fn binary(self, op: BinOperator, rhs: Value) -> Result<Value, EvalError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => real_binary(op, a, b),
            (Value::Sequence, _) | (_, Value::Sequence) => Err(EvalError::Invalid),
            (a, b) => complex_binary(op, a.to_complex(), b.to_complex()),
        }
    }

    pub(crate) fn negate(self) -> Result<Value, EvalError> {
        match self {
            Value::Real(v) => Ok(Value::Real(-v)),
            Value::Complex(z) => Ok(Value::Complex(-z)),
            Value::Sequence => Err(EvalError::Invalid),
        }
    }

    pub(crate) fn plus(self) -> Result<Value, EvalError> {
        match self {
            Value::Sequence => Err(EvalError::Invalid),
            v => Ok(v),
        }
    }

    fn to_complex(self) -> Complex64 {
        match self {
            Value::Real(v) => Complex64::new(v, 0.0),
            Value::Complex(z) => z,
            Value::Sequence => Complex64::new(f64::NAN, f64::NAN),
        }
    }
}

fn real_binary(op: BinOperator, a: f64, b: f64) -> Result<Value, EvalError> {
    let v = match op {
        BinOperator::Add => a + b,
        BinOperator::Sub => a - b,
        BinOperator::Mult => a * b,
        BinOperator::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinOperator::Mod => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            floored_mod(a, b)
        }
        BinOperator::FloorDiv => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            floor_div(a, b)
        }
        BinOperator::Pow => return real_pow(a, b),
        _ => return Err(EvalError::Invalid),
    };
    Ok(Value::Real(v))
}

/// Remainder carrying the sign of the divisor: `-7 % 3 == 2`, `7 % -3 == -2`.
pub(crate) fn floored_mod(a: f64, b: f64) -> f64 {
    let m = a % b;
    if m != 0.0 {
        if (b < 0.0) != (m < 0.0) {
            m + b
        } else {
            m
        }
    } else {
        0.0f64.copysign(b)
    }
}

/// Quotient rounded towards negative infinity, computed from the remainder so
/// that `floor_div(a, b) * b + floored_mod(a, b)` reproduces `a` as closely
/// as the float format allows.
pub(crate) fn floor_div(a: f64, b: f64) -> f64 {
    let m = a % b;
    let mut div = (a - m) / b;
    if m != 0.0 && (b < 0.0) != (m < 0.0) {
        div -= 1.0;
    }
    if div == 0.0 {
        return 0.0f64.copysign(a / b);
    }
    let floored = div.floor();
    if div - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}

/// `a ** b` on reals. A negative base with a fractional exponent leaves the
/// reals and produces a complex value.
fn real_pow(a: f64, b: f64) -> Result<Value, EvalError> {
    if b == 0.0 || a == 1.0 {
        return Ok(Value::Real(1.0));
    }
    if a.is_nan() || b.is_nan() || a.is_infinite() || b.is_infinite() {
        return Ok(Value::Real(a.powf(b)));
    }
    if a == 0.0 {
        if b < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(Value::Real(a.powf(b)));
    }
    if a < 0.0 && b.fract() != 0.0 {
        return complex_pow(Complex64::new(a, 0.0), Complex64::new(b, 0.0));
    }
    let v = a.powf(b);
    if v.is_infinite() {
        return Err(EvalError::Overflow);
    }
    Ok(Value::Real(v))
}

fn complex_binary(op: BinOperator, a: Complex64, b: Complex64) -> Result<Value, EvalError> {
    let z = match op {
        BinOperator::Add => a + b,
        BinOperator::Sub => a - b,
        BinOperator::Mult => a * b,
        BinOperator::Div => {
            if b.re == 0.0 && b.im == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinOperator::Pow => return complex_pow(a, b),
        // no floor division or remainder on complex numbers
        _ => return Err(EvalError::Invalid),
    };
    Ok(Value::Complex(z))
}

fn complex_pow(base: Complex64, exp: Complex64) -> Result<Value, EvalError> {
    if exp.re == 0.0 && exp.im == 0.0 {
        return Ok(Value::Complex(Complex64::new(1.0, 0.0)));
    }
    if base.re == 0.0 && base.im == 0.0 {
        if exp.im != 0.0 || exp.re < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(Value::Complex(Complex64::new(0.0, 0.0)));
    }
    let z = base.powc(exp);
    let finite_in = base.is_finite() && exp.is_finite();
    if finite_in && (z.re.is_infinite() || z.im.is_infinite()) {
        return Err(EvalError::Overflow);
    }
    Ok(Value::Complex(z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(v: Result<Value, EvalError>) -> f64 {
        match v {
            Ok(Value::Real(x)) => x,
            other => panic!("expected a real, got {:?}", other),
        }
    }

    #[test]
    fn modulo_follows_divisor_sign() {
        assert_eq!(floored_mod(7.0, 3.0), 1.0);
        assert_eq!(floored_mod(-7.0, 3.0), 2.0);
        assert_eq!(floored_mod(7.0, -3.0), -2.0);
        assert_eq!(floored_mod(-7.0, -3.0), -1.0);
        assert_eq!(floored_mod(5.5, 2.0), 1.5);
    }

    #[test]
    fn floor_division_rounds_down() {
        assert_eq!(floor_div(7.0, 2.0), 3.0);
        assert_eq!(floor_div(-7.0, 2.0), -4.0);
        assert_eq!(floor_div(7.0, -2.0), -4.0);
        assert_eq!(floor_div(7.5, 2.0), 3.0);
        assert!(floor_div(0.0, -3.0).is_sign_negative());
    }

    #[test]
    fn zero_divisors() {
        for op in [BinOperator::Div, BinOperator::Mod, BinOperator::FloorDiv] {
            assert_eq!(real_binary(op, 1.0, 0.0), Err(EvalError::DivisionByZero));
        }
        assert_eq!(real_pow(0.0, -1.0), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn float_overflow_only_raised_by_pow() {
        assert_eq!(real(real_binary(BinOperator::Mult, 1e308, 10.0)), f64::INFINITY);
        assert_eq!(real_pow(10.0, 400.0), Err(EvalError::Overflow));
    }

    #[test]
    fn pow_edge_cases() {
        assert_eq!(real(real_pow(f64::NAN, 0.0)), 1.0);
        assert_eq!(real(real_pow(1.0, f64::NAN)), 1.0);
        assert_eq!(real(real_pow(-8.0, 3.0)), -512.0);
        assert_eq!(real(real_pow(2.0, -2.0)), 0.25);
        assert!(matches!(real_pow(-8.0, 1.0 / 3.0), Ok(Value::Complex(_))));
    }

    #[test]
    fn complex_stays_complex() {
        let i = Value::Complex(Complex64::new(0.0, 1.0));
        let sq = i.binary(BinOperator::Mult, i).unwrap();
        assert_eq!(sq, Value::Complex(Complex64::new(-1.0, 0.0)));
        assert_eq!(i.binary(BinOperator::Mod, Value::Real(2.0)), Err(EvalError::Invalid));
        assert_eq!(
            Value::Real(1.0).binary(BinOperator::Div, Value::Complex(Complex64::new(0.0, 0.0))),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn sequences_refuse_arithmetic() {
        assert_eq!(
            Value::Sequence.binary(BinOperator::Add, Value::Real(1.0)),
            Err(EvalError::Invalid)
        );
        assert_eq!(Value::Sequence.negate(), Err(EvalError::Invalid));
    }
}
