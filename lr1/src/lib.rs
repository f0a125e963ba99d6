//! # lr1
//!
//! A small engine for table-driven shift-reduce parsers.
//!
//! A grammar supplies an [`Automaton`]: a start state, an action table
//! (`lookup(state, kind) -> ParserAction`) and the semantic reductions that
//! build nonterminals from popped right-hand sides. Tokens come from any
//! [`TokenSource`]. The [`Parser`] owns the two parallel stacks (states and
//! symbols) and runs the classic loop:
//!
//! - **Shift** moves the lookahead from the source onto the stack,
//! - **Reduce** pops a right-hand side, asks the automaton for the
//!   nonterminal, and immediately shifts it through the exposed state
//!   (**goto**) without touching the input,
//! - **Accept** returns the single remaining symbol,
//! - **Error** either discards the lookahead ([`ErrorMode::Resync`]) or
//!   stops the parse ([`ErrorMode::Abort`]).
//!
//! Fatal conditions end the loop with [`Outcome::Failed`]; no partially
//! built tree is ever handed back.
mod cursor;
mod error;
mod lexer;
mod parser;

pub use crate::cursor::{LexerCursor, Position, Span};
pub use crate::error::{ParseError, ParseErrorKind};
pub use crate::lexer::{GrammarSymbol, LexerStats, Token, TokenSource, VecSource};
pub use crate::parser::{
    Analysis, Automaton, ErrorMode, Outcome, Parser, ParserAction, ParserProdID, ParserStateID,
    ParserStats,
};
