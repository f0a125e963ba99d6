//! The token-source side of the engine.
//!
//! A parser never reads characters. It pulls [`Token`]s from a
//! [`TokenSource`], which must support a non-consuming `peek` so the parser
//! can inspect a lookahead, decide to reduce, and inspect the same lookahead
//! again. A token leaves the source only through `consume`, once the parser
//! has committed it to a shift or discarded it during recovery.

use crate::{ParseError, Span};
use smartstring::alias::String;
use std::collections::VecDeque;
use std::fmt::Debug;

/// A symbol that can sit on the parser's symbol stack.
///
/// Implemented by the grammar's closed sum type of terminals and
/// nonterminals. The engine only needs the kind tag to index the action
/// table and a rendering for diagnostics.
pub trait GrammarSymbol: Debug {
    type Kind: Copy + Debug + Eq;

    fn kind(&self) -> Self::Kind;

    /// `true` for token-derived symbols, `false` for reduction results.
    fn is_terminal(&self) -> bool;

    /// `true` for the end-of-input marker. The driver never discards it.
    fn is_end(&self) -> bool {
        false
    }

    /// Text used in diagnostics and stack dumps.
    fn text(&self) -> String;
}

/// A stack entry: a symbol and the source span it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<S> {
    pub symbol: S,
    pub span: Option<Span>,
}

impl<S> Token<S> {
    pub fn new(symbol: S, span: Option<Span>) -> Self {
        Self { symbol, span }
    }

    /// Extends this token's span to cover `other_span` as well.
    pub fn merge_span(&mut self, other_span: &Option<Span>) {
        self.span = Span::merge_opt(self.span, *other_span);
    }
}

/// Lexer counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerStats {
    /// Characters read from the input.
    pub chars: usize,
    /// Tokens classified (the end marker included).
    pub tokens: usize,
}

/// A lazily pulled sequence of classified tokens.
///
/// `peek` must be idempotent: calling it repeatedly without an intervening
/// `consume` reports the same token and leaves the stream where it was.
pub trait TokenSource {
    type Symbol: GrammarSymbol;

    /// Reports the next token without removing it.
    ///
    /// `Ok(None)` means the source has nothing left to offer, not even an end
    /// marker. `Err` means the input could not be classified.
    fn peek(&mut self) -> Result<Option<&Token<Self::Symbol>>, ParseError>;

    /// Removes and returns the token `peek` last reported.
    fn consume(&mut self) -> Result<Option<Token<Self::Symbol>>, ParseError>;

    fn stats(&self) -> LexerStats {
        LexerStats::default()
    }
}

/// A token source over pre-classified tokens.
///
/// Useful when tokens come from somewhere other than text, and for driving
/// an automaton in tests. Unlike a text lexer it does not synthesize an end
/// marker: once the queue is empty, `peek` returns `Ok(None)`.
#[derive(Debug, Clone)]
pub struct VecSource<S> {
    tokens: VecDeque<Token<S>>,
    stats: LexerStats,
}

impl<S: GrammarSymbol> VecSource<S> {
    pub fn new(tokens: impl IntoIterator<Item = Token<S>>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            stats: LexerStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<S: GrammarSymbol> TokenSource for VecSource<S> {
    type Symbol = S;

    fn peek(&mut self) -> Result<Option<&Token<S>>, ParseError> {
        Ok(self.tokens.front())
    }

    fn consume(&mut self) -> Result<Option<Token<S>>, ParseError> {
        let token = self.tokens.pop_front();
        if token.is_some() {
            self.stats.tokens += 1;
        }
        Ok(token)
    }

    fn stats(&self) -> LexerStats {
        self.stats.clone()
    }
}
