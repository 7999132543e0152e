//! Statement mini-language for `.(` ... `.)` blocks
//!
//! Scripts are sequences of assignments (`name = expr`) and bare
//! expressions, separated by newlines or `;`, with `#` starting a line
//! comment. Values are 64-bit integers and strings. Blocks run in
//! document order against the shared render scope, so a value assigned
//! in one block is visible to every later block, substitution, and
//! included document.

mod ast;
mod eval;
mod lexer;
mod parser;

pub use eval::{run, EvalCtx};
pub use lexer::{tokenize, Token, TokenKind};

use thiserror::Error;

/// Failure inside a script, with a line relative to the script body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ScriptError {
    pub message: String,
    pub line: usize,
}

impl ScriptError {
    pub(crate) fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}
