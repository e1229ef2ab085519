//! `pywalk` library crate.
//!
//! High-level layout:
//! - frontend: `lexer` turns source text into the token stream an external
//!   parser consumes (`token` holds the token model)
//! - shared runtime model: `runtime` (values, classes, output contexts,
//!   comparators)
//! - execution: `ast` node definitions evaluated in place by `interpreter`
pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod runtime;
pub mod token;

pub use runtime::value::{Closure, Value};
