//! # Calculator lexer
//!
//! [`CalcLexer`] classifies a character stream into calculator tokens on
//! demand. It holds at most one classified token as lookahead, so `peek` is
//! idempotent and the parser can consult the same token across reductions.
//!
//! Lexical rules:
//!
//! - whitespace is skipped,
//! - a maximal run of ASCII letters, digits and `.` that starts with a letter
//!   is a variable; one that starts with a digit is a number,
//! - `+ - * / ( )` are single-character tokens,
//! - exhausted input yields the end marker, and keeps yielding it,
//! - anything else, or a digit-led run that is not a valid numeral, is a
//!   [`ParseErrorKind::Tokenize`](lr1::ParseErrorKind::Tokenize) error.

use crate::{BinaryOperator, Bracket, Symbol};
use lr1::{LexerCursor, LexerStats, ParseError, Span, Token, TokenSource};
use smartstring::alias::String;
use std::iter::{Fuse, Peekable};

/// A lazy tokenizer over any `char` iterator.
pub struct CalcLexer<I>
where
    I: Iterator<Item = char>,
{
    input: Peekable<Fuse<I>>,
    cursor: LexerCursor,
    pending: Option<Result<Token<Symbol>, ParseError>>,
    stats: LexerStats,
}

impl<I> CalcLexer<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(input: I) -> Self {
        Self {
            input: input.fuse().peekable(),
            cursor: LexerCursor::new(),
            pending: None,
            stats: LexerStats::default(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.input.next()?;
        self.cursor.advance(c);
        self.stats.chars += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.input.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    /// Collects the rest of an alphanumeric run into `word`.
    fn take_word(&mut self, word: &mut String) {
        while let Some(&c) = self.input.peek() {
            if !(c.is_ascii_alphanumeric() || c == '.') {
                break;
            }
            word.push(c);
            self.bump();
        }
    }

    fn scan(&mut self) -> Result<Token<Symbol>, ParseError> {
        self.skip_whitespace();
        self.cursor.begin();

        let Some(c) = self.bump() else {
            self.stats.tokens += 1;
            log::trace!("End at {}", self.cursor.position().column);
            return Ok(Token::new(
                Symbol::End,
                Some(Span::at(self.cursor.position())),
            ));
        };

        let symbol = match c {
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                word.push(c);
                self.take_word(&mut word);
                Symbol::variable(word)
            }
            c if c.is_ascii_digit() => {
                let mut word = String::new();
                word.push(c);
                self.take_word(&mut word);
                match word.parse::<f64>() {
                    Ok(value) => Symbol::number(value),
                    Err(_) => return Err(ParseError::tokenize(&word, Some(self.cursor.span))),
                }
            }
            '(' => Symbol::Bracket(Bracket::Open),
            ')' => Symbol::Bracket(Bracket::Close),
            c => match BinaryOperator::from_char(c) {
                Some(op) => Symbol::Operator(op),
                None => {
                    let mut lexeme = String::new();
                    lexeme.push(c);
                    return Err(ParseError::tokenize(&lexeme, Some(self.cursor.span)));
                }
            },
        };

        self.stats.tokens += 1;
        log::trace!("Token {:?} at {}", symbol.kind(), self.cursor.span);
        Ok(Token::new(symbol, Some(self.cursor.span)))
    }
}

impl<I> TokenSource for CalcLexer<I>
where
    I: Iterator<Item = char>,
{
    type Symbol = Symbol;

    fn peek(&mut self) -> Result<Option<&Token<Symbol>>, ParseError> {
        if self.pending.is_none() {
            let next = self.scan();
            self.pending = Some(next);
        }
        match &self.pending {
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(err)) => Err(err.clone()),
            None => Ok(None),
        }
    }

    fn consume(&mut self) -> Result<Option<Token<Symbol>>, ParseError> {
        match self.pending.take() {
            Some(next) => next.map(Some),
            None => self.scan().map(Some),
        }
    }

    fn stats(&self) -> LexerStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Atom, SymbolKind};
    use lr1::{ParseErrorKind, span};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn kinds(input: &str) -> Vec<SymbolKind> {
        let mut lexer = CalcLexer::new(input.chars());
        let mut out = Vec::new();
        loop {
            let token = lexer.consume().unwrap().unwrap();
            let kind = token.symbol.kind();
            out.push(kind);
            if kind == SymbolKind::End {
                return out;
            }
        }
    }

    #[test]
    fn classifies_every_token_kind() {
        init_logger();
        use SymbolKind::*;
        assert_eq!(
            kinds("(a1 + 2.5) * x / 7 - y"),
            vec![
                OpenBracket, Variable, Add, Number, CloseBracket, Mul, Variable, Div, Number,
                Sub, Variable, End
            ]
        );
    }

    #[test]
    fn values_and_spans() {
        init_logger();
        let mut lexer = CalcLexer::new("  12.5\t+ rate".chars());
        assert!(matches!(
            lexer.consume().unwrap(),
            Some(Token {
                symbol: Symbol::Atom(Atom::Number(v)),
                span: span!(0, 2, 0, 6),
            }) if v == 12.5
        ));
        assert!(matches!(
            lexer.consume().unwrap(),
            Some(Token {
                symbol: Symbol::Operator(BinaryOperator::Add),
                span: span!(0, 7, 0, 8),
            })
        ));
        assert!(matches!(
            lexer.consume().unwrap(),
            Some(Token {
                symbol: Symbol::Atom(Atom::Variable(ref name)),
                span: span!(0, 9, 0, 13),
            }) if name == "rate"
        ));
        assert!(matches!(
            lexer.consume().unwrap(),
            Some(Token {
                symbol: Symbol::End,
                span: span!(0, 13, 0, 13),
            })
        ));
        assert_eq!(lexer.stats().chars, 13);
        assert_eq!(lexer.stats().tokens, 4);
    }

    #[test]
    fn spans_track_lines() {
        let mut lexer = CalcLexer::new("1\n+\n  b".chars());
        lexer.consume().unwrap();
        lexer.consume().unwrap();
        let token = lexer.consume().unwrap().unwrap();
        assert_eq!(token.span, span!(2, 2, 2, 3));
    }

    #[test]
    fn adjacent_tokens_need_no_whitespace() {
        use SymbolKind::*;
        assert_eq!(
            kinds("2*(x+1)"),
            vec![Number, Mul, OpenBracket, Variable, Add, Number, CloseBracket, End]
        );
    }

    #[test]
    fn peek_is_idempotent() {
        let mut lexer = CalcLexer::new("x y".chars());
        let first = lexer.peek().unwrap().cloned();
        let second = lexer.peek().unwrap().cloned();
        assert_eq!(first, second);
        assert_eq!(lexer.stats().tokens, 1);

        let consumed = lexer.consume().unwrap();
        assert_eq!(consumed, first);
        assert_eq!(
            lexer.peek().unwrap().map(|t| t.symbol.clone()),
            Some(Symbol::variable("y"))
        );
    }

    #[test]
    fn end_marker_is_sticky() {
        let mut lexer = CalcLexer::new("   ".chars());
        for _ in 0..3 {
            assert_eq!(
                lexer.consume().unwrap().map(|t| t.symbol),
                Some(Symbol::End)
            );
        }
        assert_eq!(lexer.peek().unwrap().map(|t| t.symbol.clone()), Some(Symbol::End));
    }

    #[test]
    fn unknown_character_is_a_tokenize_error() {
        let mut lexer = CalcLexer::new("1 % 2".chars());
        lexer.consume().unwrap();
        let err = lexer.peek().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Tokenize);
        assert_eq!(err.span, span!(0, 2, 0, 3));
        assert!(err.message.contains("'%'"));
        // the failure is reported again until consumed
        assert_eq!(lexer.peek().unwrap_err(), err);
    }

    #[test]
    fn malformed_numerals_are_rejected() {
        for input in ["1.2.3", "12ab", "3.x"] {
            let mut lexer = CalcLexer::new(input.chars());
            let err = lexer.consume().unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::Tokenize, "{input}");
            assert!(err.message.contains(input), "{input}");
        }
    }

    #[test]
    fn letter_led_runs_may_contain_digits_and_dots() {
        let mut lexer = CalcLexer::new("v2.max".chars());
        assert_eq!(
            lexer.consume().unwrap().map(|t| t.symbol),
            Some(Symbol::variable("v2.max"))
        );
    }

    #[test]
    fn numerals_accept_fractions_and_exponents() {
        for (input, expected) in [("0", 0.0), ("007", 7.0), ("1.", 1.0), ("2e3", 2000.0)] {
            let mut lexer = CalcLexer::new(input.chars());
            assert_eq!(
                lexer.consume().unwrap().map(|t| t.symbol),
                Some(Symbol::number(expected)),
                "{input}"
            );
        }
    }
}
