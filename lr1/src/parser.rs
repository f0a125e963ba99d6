use crate::{GrammarSymbol, LexerStats, ParseError, Span, Token, TokenSource};
use smartstring::alias::String;
use std::fmt::Debug;
use std::mem;

/// One cell of an action table.
///
/// `Shift` doubles as goto: when the lookahead is a nonterminal that a
/// reduction just produced, shifting it consumes no input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserAction<S, P>
where
    S: ParserStateID,
    P: ParserProdID,
{
    Error,
    Accept,
    Shift(S),
    Reduce(P),
}

pub trait ParserStateID: Copy + Debug + Eq {}

pub trait ParserProdID: Copy + Debug + Eq {
    /// Number of right-hand-side symbols popped by this production.
    fn size(&self) -> usize;

    fn label(&self) -> &'static str;
}

type Action<A> = ParserAction<<A as Automaton>::StateID, <A as Automaton>::ProdID>;
type Kind<A> = <<A as Automaton>::Symbol as GrammarSymbol>::Kind;

/// A fixed grammar: its action table and its semantic reductions.
pub trait Automaton {
    type StateID: ParserStateID;
    type ProdID: ParserProdID;
    type Symbol: GrammarSymbol;

    fn start_state(&self) -> Self::StateID;

    fn lookup(&self, state: Self::StateID, kind: Kind<Self>) -> Action<Self>;

    /// Builds the left-hand side of `prod` from its right-hand side.
    ///
    /// `rhs` holds exactly `prod.size()` symbols in source order. A shape
    /// that does not match the production is reported as
    /// [`ParseErrorKind::Internal`](crate::ParseErrorKind::Internal).
    fn reduce(
        &mut self,
        prod: Self::ProdID,
        rhs: Vec<Self::Symbol>,
    ) -> Result<Self::Symbol, ParseError>;
}

/// What the driver does with a token that has no action in the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Report the token, discard it and keep parsing.
    #[default]
    Resync,
    /// Stop at the first unexpected token.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Lookaheads examined.
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
    pub gotos: usize,
    /// Unexpected tokens dropped under [`ErrorMode::Resync`].
    pub discarded: usize,
}

/// How a parse ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S> {
    /// Accepted without any diagnostic.
    Accepted(S),
    /// Accepted, but only after discarding unexpected tokens.
    Recovered(S),
    /// Stopped by a fatal error. No tree survives.
    Failed(ParseError),
}

#[derive(Debug, Clone)]
pub struct Analysis<S> {
    pub outcome: Outcome<S>,
    /// Every error reported, in order. A fatal error is the last entry.
    pub diagnostics: Vec<ParseError>,
    pub stats: ParserStats,
}

impl<S> Analysis<S> {
    /// The parse result, present only when the input parsed cleanly.
    pub fn into_result(self) -> Option<S> {
        match self.outcome {
            Outcome::Accepted(s) => Some(s),
            Outcome::Recovered(_) | Outcome::Failed(_) => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted(_))
    }

    /// The tree assembled from the tokens that survived recovery.
    pub fn recovered(&self) -> Option<&S> {
        match &self.outcome {
            Outcome::Recovered(s) => Some(s),
            _ => None,
        }
    }

    pub fn fatal_error(&self) -> Option<&ParseError> {
        match &self.outcome {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// The driver loop.
///
/// Owns a token source, an automaton and the two parallel stacks. The state
/// stack holds the start state plus one entry per stacked symbol.
pub struct Parser<T, A>
where
    T: TokenSource,
    A: Automaton<Symbol = T::Symbol>,
{
    source: T,
    automaton: A,
    mode: ErrorMode,
    tokens: Vec<Token<A::Symbol>>,
    states: Vec<A::StateID>,
    diagnostics: Vec<ParseError>,
    stats: ParserStats,
}

impl<T, A> Parser<T, A>
where
    T: TokenSource,
    A: Automaton<Symbol = T::Symbol>,
{
    pub fn new(source: T, automaton: A) -> Self {
        Self::with_mode(source, automaton, ErrorMode::default())
    }

    pub fn with_mode(source: T, automaton: A, mode: ErrorMode) -> Self {
        Self {
            source,
            automaton,
            mode,
            tokens: Vec::new(),
            states: Vec::new(),
            diagnostics: Vec::new(),
            stats: ParserStats::default(),
        }
    }

    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    pub fn stats(&self) -> ParserStats {
        self.stats.clone()
    }

    pub fn lexer_stats(&self) -> LexerStats {
        self.source.stats()
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Runs the automaton over the token source until accept or fatal error.
    pub fn analyze(&mut self) -> Analysis<A::Symbol> {
        self.tokens.clear();
        self.states.clear();
        self.diagnostics.clear();
        self.stats = ParserStats::default();
        self.states.push(self.automaton.start_state());

        let outcome = match self.run() {
            Ok(symbol) if self.diagnostics.is_empty() => Outcome::Accepted(symbol),
            Ok(symbol) => Outcome::Recovered(symbol),
            Err(err) => {
                log::warn!("{err}; analysis terminated");
                self.diagnostics.push(err.clone());
                Outcome::Failed(err)
            }
        };
        self.tokens.clear();
        self.states.clear();

        Analysis {
            outcome,
            diagnostics: mem::take(&mut self.diagnostics),
            stats: self.stats.clone(),
        }
    }

    /// Shorthand for `analyze().into_result()`.
    pub fn parse(&mut self) -> Option<A::Symbol> {
        self.analyze().into_result()
    }

    fn run(&mut self) -> Result<A::Symbol, ParseError> {
        loop {
            debug_assert_eq!(self.states.len(), self.tokens.len() + 1);
            let state = self.top_state()?;
            let (kind, span) = match self.source.peek()? {
                Some(token) if !token.symbol.is_terminal() => {
                    return Err(ParseError::internal(format!(
                        "token source produced nonterminal {:?}",
                        token.symbol.kind()
                    )));
                }
                Some(token) => {
                    if log::log_enabled!(log::Level::Trace) {
                        dump_state(&self.states, &self.tokens, token);
                    }
                    (token.symbol.kind(), token.span)
                }
                None => {
                    let last = self.tokens.last().and_then(|t| t.span);
                    return Err(ParseError::stream_exhausted(last));
                }
            };
            self.stats.tokens += 1;

            match self.automaton.lookup(state, kind) {
                Action::<A>::Shift(new_state) => {
                    log::trace!("Shift {:?} -> {:?}", kind, new_state);
                    let token = self
                        .source
                        .consume()?
                        .ok_or_else(|| ParseError::internal("token source lost its lookahead"))?;
                    self.tokens.push(token);
                    self.states.push(new_state);
                    self.stats.shifts += 1;
                }

                Action::<A>::Reduce(prod_id) => {
                    self.reduce(prod_id)?;
                }

                Action::<A>::Accept => {
                    log::trace!("Accept");
                    if self.tokens.len() != 1 {
                        return Err(ParseError::internal(format!(
                            "accept with {} symbols on the stack",
                            self.tokens.len()
                        )));
                    }
                    return self
                        .tokens
                        .pop()
                        .map(|t| t.symbol)
                        .ok_or_else(|| ParseError::internal("stack underflow"));
                }

                Action::<A>::Error => {
                    self.error(state, span)?;
                }
            }
        }
    }

    /// Pops the right-hand side of `prod_id`, synthesizes its nonterminal
    /// and hands it to the exposed state.
    fn reduce(&mut self, prod_id: A::ProdID) -> Result<(), ParseError> {
        let n = prod_id.size();
        if n > self.tokens.len() || n >= self.states.len() {
            return Err(ParseError::internal(format!(
                "stack underflow reducing {}",
                prod_id.label()
            )));
        }
        log::debug!("Reduce {}", prod_id.label());

        let rhs = self.tokens.split_off(self.tokens.len() - n);
        self.states.truncate(self.states.len() - n);
        let (symbols, spans): (Vec<_>, Vec<_>) =
            rhs.into_iter().map(|t| (t.symbol, t.span)).unzip();

        let mut lhs = Token::new(self.automaton.reduce(prod_id, symbols)?, None);
        for span in &spans {
            lhs.merge_span(span);
        }
        self.stats.reductions += 1;
        self.goto(lhs)
    }

    /// Shifts a freshly reduced nonterminal without touching the input.
    fn goto(&mut self, token: Token<A::Symbol>) -> Result<(), ParseError> {
        let state = self.top_state()?;
        let kind = token.symbol.kind();
        if token.symbol.is_terminal() {
            return Err(ParseError::internal(format!(
                "reduction produced terminal {kind:?}"
            )));
        }
        let Action::<A>::Shift(new_state) = self.automaton.lookup(state, kind) else {
            return Err(ParseError::internal(format!(
                "no goto from {state:?} on {kind:?}"
            )));
        };
        log::trace!("Goto {:?} -> {:?}", kind, new_state);
        self.tokens.push(token);
        self.states.push(new_state);
        self.stats.gotos += 1;
        Ok(())
    }

    fn error(&mut self, state: A::StateID, span: Option<Span>) -> Result<(), ParseError> {
        let (text, is_end) = match self.source.peek()? {
            Some(token) => (token.symbol.text(), token.symbol.is_end()),
            None => return Err(ParseError::stream_exhausted(span)),
        };
        let err = if is_end {
            ParseError::unexpected_end(span)
        } else {
            ParseError::unexpected(&text, span)
        };
        if err.is_fatal() || self.mode == ErrorMode::Abort {
            return Err(err);
        }
        log::warn!("{err} in state {state:?} was discarded");
        self.diagnostics.push(err);
        self.source.consume()?;
        self.stats.discarded += 1;
        Ok(())
    }

    fn top_state(&self) -> Result<A::StateID, ParseError> {
        self.states
            .last()
            .copied()
            .ok_or_else(|| ParseError::internal("empty state stack"))
    }
}

fn dump_state<St, S>(states: &[St], tokens: &[Token<S>], incoming: &Token<S>)
where
    St: Debug,
    S: GrammarSymbol,
{
    let mut output = String::new();
    for (i, (state, token)) in states
        .iter()
        .zip(tokens.iter().chain(std::iter::once(incoming)))
        .enumerate()
    {
        output.push_str(&format!(
            "<{:?}>  {}{}  ",
            state,
            if i == states.len() - 1 { "<-  " } else { "" },
            token.symbol.text(),
        ));
    }
    log::trace!("{}", output);
}
