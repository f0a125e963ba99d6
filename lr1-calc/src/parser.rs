//! # Calculator parser
//!
//! [`CalcParser`] couples a [`CalcLexer`] with the [`CalcAutomaton`] table
//! inside the generic [`lr1::Parser`] driver.
//!
//! - [`CalcParser::analyze`] reports everything: the [`Outcome`], every
//!   diagnostic raised along the way and the driver counters.
//! - [`CalcParser::parse`] and the free [`parse`] function return the tree
//!   only when the input parsed without any diagnostic.
//!
//! ```rust
//! use lr1_calc::{Bindings, parse};
//!
//! let axiom = parse("2 + 3 * 4").unwrap();
//! assert_eq!(axiom.text(), "2+3*4");
//! assert_eq!(axiom.eval(&Bindings::new()).unwrap(), 14.0);
//! assert!(parse("2 + + 3").is_none());
//! ```

use crate::{Axiom, Bindings, CalcAutomaton, CalcError, CalcLexer, Symbol};
use lr1::{Analysis, ErrorMode, LexerStats, Outcome, Parser, ParserStats};

pub struct CalcParser<I>
where
    I: Iterator<Item = char>,
{
    parser: Parser<CalcLexer<I>, CalcAutomaton>,
}

impl<I> CalcParser<I>
where
    I: Iterator<Item = char>,
{
    /// A parser that discards unexpected tokens and keeps going.
    pub fn new(input: I) -> Self {
        Self::with_mode(input, ErrorMode::default())
    }

    pub fn with_mode(input: I, mode: ErrorMode) -> Self {
        Self {
            parser: Parser::with_mode(CalcLexer::new(input), CalcAutomaton, mode),
        }
    }

    pub fn mode(&self) -> ErrorMode {
        self.parser.mode()
    }

    /// Parses the whole input. The result's symbol, when there is one, is
    /// always a [`Symbol::Axiom`].
    pub fn analyze(&mut self) -> Analysis<Symbol> {
        let analysis = self.parser.analyze();
        match &analysis.outcome {
            Outcome::Accepted(axiom) => log::debug!("accepted '{axiom}'"),
            Outcome::Recovered(axiom) => log::debug!(
                "recovered '{axiom}' after {} error(s)",
                analysis.diagnostics.len()
            ),
            Outcome::Failed(err) => log::debug!("failed: {err}"),
        }
        analysis
    }

    /// The tree, if the input parsed cleanly.
    pub fn parse(&mut self) -> Option<Axiom> {
        self.analyze().into_result().and_then(Symbol::into_axiom)
    }

    pub fn stats(&self) -> (LexerStats, ParserStats) {
        (self.parser.lexer_stats(), self.parser.stats())
    }
}

/// Parses `expr` with the default error mode.
///
/// Returns `None` for any input that raised a diagnostic, including inputs
/// the parser recovered from.
pub fn parse(expr: &str) -> Option<Axiom> {
    CalcParser::new(expr.chars()).parse()
}

/// Parses `expr` and evaluates it against `bindings`.
///
/// # Errors
/// [`CalcError::Parse`] when a fatal error stopped the parse,
/// [`CalcError::InvalidExpression`] when the parser only recovered a tree,
/// [`CalcError::Eval`] when evaluation fails.
pub fn evaluate(expr: &str, bindings: &Bindings) -> Result<f64, CalcError> {
    let Analysis {
        outcome,
        diagnostics,
        ..
    } = CalcParser::new(expr.chars()).analyze();
    let axiom = match outcome {
        Outcome::Accepted(symbol) => symbol.into_axiom(),
        Outcome::Recovered(_) => None,
        Outcome::Failed(err) => return Err(CalcError::Parse(err)),
    };
    let axiom = axiom.ok_or(CalcError::InvalidExpression { diagnostics })?;
    Ok(axiom.eval(bindings)?)
}
