//! Parse-time error type shared by token sources and the driver loop.
//!
//! A [`ParseError`] is flat: a [`ParseErrorKind`], a human-readable message
//! and an optional [`Span`]. The kind decides whether the driver keeps going
//! ([`ParseErrorKind::UnexpectedSymbol`] under [`ErrorMode::Resync`]) or stops.
//!
//! # Examples
//!
//! ```rust
//! # use lr1::{ParseError, ParseErrorKind, span};
//! let err = ParseError::unexpected("+", span!(0, 2, 0, 3));
//! assert_eq!(err.kind, ParseErrorKind::UnexpectedSymbol);
//! assert!(err.to_string().contains("unexpected token '+'"));
//! ```
//!
//! [`ErrorMode::Resync`]: crate::ErrorMode::Resync

use crate::Span;
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// Stable error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The token source could not classify its input.
    Tokenize,
    /// A token is not valid in the current parser state.
    UnexpectedSymbol,
    /// The end marker arrived while the parse still expected input.
    UnexpectedEnd,
    /// The token source ran dry before the parse completed.
    StreamExhausted,
    /// The automaton's table and its reductions disagree.
    Internal,
}

impl ParseErrorKind {
    /// Whether an error of this kind always terminates the parse.
    pub fn is_fatal(self) -> bool {
        !matches!(self, ParseErrorKind::UnexpectedSymbol)
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::Tokenize => "tokenize error",
            ParseErrorKind::UnexpectedSymbol => "syntax error",
            ParseErrorKind::UnexpectedEnd => "syntax error",
            ParseErrorKind::StreamExhausted => "stream exhausted",
            ParseErrorKind::Internal => "internal parser error",
        })
    }
}

/// A parser/lexer diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}{}", at_span(.span))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Optional source span for pinpointing the error.
    pub span: Option<Span>,
}

fn at_span(span: &Option<Span>) -> std::string::String {
    span.map(|s| format!(" at {s}")).unwrap_or_default()
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl AsRef<str>, span: Option<Span>) -> Self {
        Self {
            kind,
            message: String::from(message.as_ref()),
            span,
        }
    }

    /// Input the token source cannot classify, such as an unknown character
    /// or a malformed numeral.
    pub fn tokenize(lexeme: impl AsRef<str>, span: Option<Span>) -> Self {
        Self::new(
            ParseErrorKind::Tokenize,
            format!("unrecognized input '{}'", lexeme.as_ref()),
            span,
        )
    }

    /// A token with rendering `found` that is invalid where it appears.
    pub fn unexpected(found: impl AsRef<str>, span: Option<Span>) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedSymbol,
            format!("unexpected token '{}'", found.as_ref()),
            span,
        )
    }

    /// The end marker where more input was required. It cannot be skipped,
    /// so this is always fatal.
    pub fn unexpected_end(span: Option<Span>) -> Self {
        Self::new(ParseErrorKind::UnexpectedEnd, "unexpected end of input", span)
    }

    pub fn stream_exhausted(span: Option<Span>) -> Self {
        Self::new(
            ParseErrorKind::StreamExhausted,
            "no further symbols to interpret",
            span,
        )
    }

    pub fn internal(message: impl AsRef<str>) -> Self {
        Self::new(ParseErrorKind::Internal, message, None)
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span;

    #[test]
    fn display_includes_kind_message_and_span() {
        let err = ParseError::tokenize("%", span!(0, 4, 0, 5));
        assert_eq!(
            err.to_string(),
            "tokenize error: unrecognized input '%' at 0:4..0:5"
        );

        let err = ParseError::unexpected_end(span!(1, 0, 1, 0));
        assert_eq!(err.to_string(), "syntax error: unexpected end of input at 1:0..1:0");

        let err = ParseError::stream_exhausted(None);
        assert_eq!(
            err.to_string(),
            "stream exhausted: no further symbols to interpret"
        );
    }

    #[test]
    fn only_unexpected_symbols_are_recoverable() {
        assert!(!ParseError::unexpected(")", None).is_fatal());
        assert!(ParseError::unexpected_end(None).is_fatal());
        assert!(ParseError::tokenize("#", None).is_fatal());
        assert!(ParseError::stream_exhausted(None).is_fatal());
        assert!(ParseError::internal("bad goto").is_fatal());
    }

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}
    #[test]
    fn parse_error_is_send_sync_static() {
        _assert_send_sync_static::<ParseError>();
    }
}
