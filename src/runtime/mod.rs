mod builtin;
mod env;
mod interpreter;
mod value;
mod window;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

pub use env::Environment;
pub use interpreter::{Interpreter, RuntimeError};
pub use value::{Function, Value};
pub use window::{NoopWindow, Window};

use crate::parser::Parser;
use crate::scanner::SyntaxError;

pub fn stock_interpreter() -> Interpreter {
    Interpreter::new(Box::new(NoopWindow))
}

/// Anything that stops a whole program run.
#[derive(Error, Debug)]
pub enum ProgramError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("interrupted")]
    Interrupted,
}

/// Cooperative cancellation signal, consulted between top-level statements
/// only. A statement that is already running is never interrupted
/// mid-flight.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives a whole program: statements are parsed on demand and executed in
/// order against one shared interpreter. The first syntax or runtime error
/// aborts the remainder; no recovery is attempted.
pub fn run_program(
    interpreter: &mut Interpreter,
    parser: &mut Parser<'_>,
    cancel: &CancelFlag,
) -> Result<(), ProgramError> {
    while let Some(statement) = parser.parse_statement()? {
        if cancel.is_cancelled() {
            return Err(ProgramError::Interrupted);
        }
        interpreter.execute_statement(&statement)?;
    }
    Ok(())
}
