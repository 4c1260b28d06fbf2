//! Calculator expression evaluation.
//!
//! `evaluate` takes the text shown on the calculator display and returns the
//! text of the result:
//!
//! 1. display glyphs are rewritten (`÷ × π ^`, then `√`, then `!`);
//! 2. the arithmetic string is parsed by a restricted recursive-descent
//!    parser that only knows `+ - * / % **`, brackets, `pi` and `sqrt`;
//! 3. the value is formatted (`4`, `3.0`, `1e+16`).

pub mod buffer;
mod number;
mod parser;
mod rewrite;

pub use buffer::{BracketMode, DisplayBuffer, Key};
pub use number::Number;
pub use parser::{BinaryOp, Expr};
pub use rewrite::{factorial, Rewrite, Segment};

use tracing::debug;

use crate::error::EvalError;

/// Evaluate a calculator display string.
pub fn evaluate(display: &str) -> Result<String, EvalError> {
    evaluate_number(display).map(|n| n.to_string())
}

/// Evaluate a calculator display string, keeping the numeric value.
pub fn evaluate_number(text: &str) -> Result<Number, EvalError> {
    let rewrite = Rewrite::parse(text)?;
    let source = rewrite.to_string();
    debug!(input = text, rewritten = %source, "evaluating expression");

    Expr::parse(&source)?.eval()
}
