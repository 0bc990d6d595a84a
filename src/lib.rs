mod ast;
mod engine;
mod error;
mod interp;
mod lexer;
mod parser;
mod registry;
mod stack;
mod validate;
mod value;

pub mod server;

pub use ast::NodeKind;
pub use engine::{Evaluator, evaluate};
pub use error::{ErrorKind, EvalError, MathError};
pub use registry::{Entry, Function, Registry, registry};
