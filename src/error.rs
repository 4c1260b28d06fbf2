use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while evaluating a calculator display string.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Division by zero")]
    #[diagnostic(code(matucalc::eval::zero_division))]
    DivisionByZero,

    #[error("Unbalanced brackets in expression")]
    #[diagnostic(
        code(matucalc::eval::brackets),
        help("Every '(' needs a matching ')'")
    )]
    UnbalancedBrackets,

    #[error("Factorial is only defined for non-negative integers, got '{operand}'")]
    #[diagnostic(code(matucalc::eval::factorial))]
    InvalidFactorial { operand: String },

    #[error("Missing operand for '{symbol}'")]
    #[diagnostic(
        code(matucalc::eval::operand),
        help("Put a number directly next to the symbol, e.g. √9 or 5!")
    )]
    MissingOperand { symbol: char },

    #[error("Unexpected '{token}' at position {position}")]
    #[diagnostic(code(matucalc::eval::token))]
    UnexpectedToken { token: String, position: usize },

    #[error("Expression is nested too deeply")]
    #[diagnostic(
        code(matucalc::eval::depth),
        help("At most 200 levels of brackets, roots or powers are allowed")
    )]
    TooDeep,

    #[error("Unexpected end of expression")]
    #[diagnostic(code(matucalc::eval::eof))]
    UnexpectedEnd,

    #[error("Result is too large")]
    #[diagnostic(code(matucalc::eval::overflow))]
    Overflow,

    #[error("Result is not a real number")]
    #[diagnostic(code(matucalc::eval::domain))]
    NotReal,
}

/// Errors raised while deriving an accent colour from an image.
#[derive(Error, Diagnostic, Debug)]
pub enum DerivationError {
    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(
        code(matucalc::fetch::decode),
        help("Supported wallpapers are PNG, JPEG and WEBP files")
    )]
    Decode { path: PathBuf, message: String },

    #[error("Image {path} has no pixels to sample")]
    #[diagnostic(code(matucalc::fetch::empty))]
    EmptyImage { path: PathBuf },

    #[error("Quantizer produced an empty palette")]
    #[diagnostic(code(matucalc::fetch::palette))]
    EmptyPalette,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Persist(#[from] ConfigError),
}

/// Errors raised while reading or writing the JSON preference files.
///
/// Read failures are normally swallowed by the `load` helpers; only the
/// strict readers and the writers surface them.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(matucalc::config::io))]
    Io { path: PathBuf, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    #[diagnostic(code(matucalc::config::json))]
    Json { path: PathBuf, message: String },

    #[error("Invalid setting: {message}")]
    #[diagnostic(code(matucalc::config::setting))]
    Setting {
        message: String,
        #[help]
        help: Option<String>,
    },
}

/// Main error type for matucalc operations
#[derive(Error, Diagnostic, Debug)]
pub enum MatuError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(matucalc::io))]
    Io { path: PathBuf, message: String },

    #[error("Invalid input: {message}")]
    #[diagnostic(code(matucalc::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, MatuError>;
