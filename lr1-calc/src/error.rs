//! # Calculator error types
//!
//! [`EvalError`] is what evaluating a tree can fail with. [`CalcError`] is the
//! single error surface of the parse-then-evaluate pipeline and of the
//! command-line argument handling. Conversions from the underlying error types
//! are derived with `#[from]`, so `?` works at call sites without explicit
//! mapping.
use lr1::ParseError;
use smartstring::alias::String;
use thiserror::Error;

/// Evaluation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A variable was referenced that has no binding.
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    /// A structural symbol (bracket, bare operator, end marker) was asked
    /// for a value.
    #[error("symbol '{0}' has no value")]
    NotEvaluable(String),
}

/// Represents all possible errors of the calculator pipeline.
///
/// # Examples
/// ```rust
/// # use lr1_calc::{Bindings, CalcError, evaluate};
/// let err = evaluate("2 +", &Bindings::new()).unwrap_err();
/// assert!(matches!(err, CalcError::Parse(_)));
///
/// let err = evaluate("2 + + 3", &Bindings::new()).unwrap_err();
/// assert!(matches!(err, CalcError::InvalidExpression { .. }));
/// ```
#[derive(Debug, Error)]
pub enum CalcError {
    /// A fatal lexer or parser error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// The parser recovered a tree but discarded tokens to get it;
    /// `diagnostics` lists every reported error.
    #[error("invalid arithmetic expression ({} error(s))", .diagnostics.len())]
    InvalidExpression { diagnostics: Vec<ParseError> },

    /// A `NAME VALUE` binding argument is missing its value.
    #[error("no value given for '{0}'")]
    MissingValue(String),

    /// A binding value is not a number.
    #[error("value for '{name}' is not a number: {source}")]
    InvalidValue {
        name: String,
        source: std::num::ParseFloatError,
    },
}
