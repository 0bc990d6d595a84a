use crate::ast::NodeKind;
use thiserror::Error;

/// Failure of a single evaluation. The `Display` output is the message handed
/// back to callers, so it never contains internal detail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Expression is empty.")]
    Empty,
    #[error("Invalid syntax: {message} at position {position}.")]
    Syntax { message: String, position: usize },
    #[error("Unsupported expression element: {0}")]
    Unsupported(NodeKind),
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Result overflow.")]
    Overflow,
    #[error("{0}")]
    Domain(&'static str),
    #[error("Complex results are not supported.")]
    ComplexResult,
    #[error("Invalid expression.")]
    Invalid,
}

/// The two categories callers can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidExpression,
    UnsupportedElement,
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Unsupported(_) => ErrorKind::UnsupportedElement,
            _ => ErrorKind::InvalidExpression,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        EvalError::Syntax {
            message: message.into(),
            position,
        }
    }
}

/// Failure raised by a registry function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("{0}")]
    Domain(&'static str),
    #[error("result out of range")]
    Overflow,
    #[error("division by zero")]
    DivisionByZero,
    /// Wrong number or kind of arguments.
    #[error("bad argument")]
    Argument,
}

impl From<MathError> for EvalError {
    fn from(e: MathError) -> Self {
        match e {
            MathError::Domain(msg) => EvalError::Domain(msg),
            MathError::Overflow => EvalError::Overflow,
            MathError::DivisionByZero => EvalError::DivisionByZero,
            MathError::Argument => EvalError::Invalid,
        }
    }
}
