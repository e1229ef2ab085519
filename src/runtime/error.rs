use std::io;

use thiserror::Error;

/// Typed errors produced while evaluating a program. None of these are
/// recoverable from inside the guest program; they propagate to the embedder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Name '{name}' is not defined")]
    NameNotFound { name: String },
    #[error("{operation} requires an object instance, got {type_name}")]
    NotAnInstance {
        operation: &'static str,
        type_name: String,
    },
    #[error("Unsupported operand types for '{operation}': {lhs} and {rhs}")]
    UnsupportedOperands {
        operation: &'static str,
        lhs: String,
        rhs: String,
    },
    #[error("Cannot compare {lhs} and {rhs} for {operation}")]
    NotComparable {
        operation: &'static str,
        lhs: String,
        rhs: String,
    },
    #[error("Comparison method '{method}' must return bool, got {type_name}")]
    NonBoolComparison {
        method: &'static str,
        type_name: String,
    },
    #[error("Class {class} has no method '{method}' taking {arity} arguments")]
    MethodNotFound {
        method: String,
        arity: usize,
        class: String,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Failed to write output: {message}")]
    Output { message: String },
}

impl RuntimeError {
    pub(crate) fn output(error: io::Error) -> Self {
        RuntimeError::Output {
            message: error.to_string(),
        }
    }
}
