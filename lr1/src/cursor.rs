//! Source positions, spans and the cursor a lexer advances over its input.
//!
//! Positions are 0-based. A [`Span`] is half-open, `[start, end)`, and is
//! attached to every token the engine stacks so that diagnostics can point
//! back into the source text.

use std::fmt;

/// A 0-based line/column position in source text.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open source range: `[start, end)`.
///
/// Invariants are not enforced here, but it is conventional for `start <= end`
/// in lexicographic `(line, column)` ordering.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty span located at `pos`.
    #[inline]
    pub const fn at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Merge with another span by covering both.
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Merges two optional spans. `None` on one side yields the other.
    pub fn merge_opt(a: Option<Span>, b: Option<Span>) -> Option<Span> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.merge(&b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Is this span empty (start == end)?
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the inclusive line range spanned by this `Span`.
    #[inline]
    pub fn line_range(&self) -> (usize, usize) {
        (self.start.line, self.end.line)
    }

    /// Pretty-print for diagnostics (human-readable).
    #[inline]
    pub fn display(&self) -> String {
        format!(
            "span {}:{} to {}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Tracks the current lexical position.
///
/// `pos` counts characters consumed so far. `span` covers the lexeme being
/// scanned: [`LexerCursor::begin`] collapses it onto the current position and
/// every [`LexerCursor::advance`] extends its end.
#[derive(Debug, Clone, Default)]
pub struct LexerCursor {
    pub pos: usize,
    pub span: Span,
}

impl LexerCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new lexeme at the current end position.
    /// Effect: span(x,y, z,w) -> span(z,w, z,w)
    #[inline]
    pub fn begin(&mut self) {
        self.span.start = self.span.end;
    }

    /// Advance by consuming `c`, updating the span end.
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.span.end.line += 1;
            self.span.end.column = 0;
        } else {
            self.span.end.column += 1;
        }
        self.pos += 1;
    }

    /// Current end position.
    #[inline]
    pub fn position(&self) -> Position {
        self.span.end
    }
}

/// Build an `Option<Span>` inline from 0-based line/column coordinates.
///
/// # Examples
///
/// ```rust
/// # use lr1::span;
/// let s = span!(0, 0, 1, 4);
/// assert_eq!(s.unwrap().end.column, 4);
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        Some($crate::Span {
            start: $crate::Position {
                line: $line_start,
                column: $col_start,
            },
            end: $crate::Position {
                line: $line_end,
                column: $col_end,
            },
        })
    };
}
