//! # Parser states and the action table
//!
//! The automaton is hand-derived for the grammar
//!
//! ```text
//! Axiom      -> Expression
//! Expression -> number | variable
//!             | Expression + Expression | Expression - Expression
//!             | Expression * Expression | Expression / Expression
//!             | ( Expression )
//! ```
//!
//! Precedence is encoded in the table: after `+` or `-` and a right operand,
//! a following `*` or `/` is shifted (binds tighter); after `*` or `/` and a
//! right operand, any lookahead reduces. Every binary state reduces on an
//! operator of equal precedence, so all four operators associate to the left.
//!
//! | state               | reached by   | behavior                                 |
//! |---------------------|--------------|------------------------------------------|
//! | `Start`             | initial      | primary; `Expression`→`Top`, `Axiom`→`Accept` |
//! | `Top`               | `Expression` | shift an operator; `$` reduces the axiom |
//! | `After*`            | operator     | primary; `Expression`→ matching `*Rhs`   |
//! | `AddRhs`/`SubRhs`   | `Expression` | shift `*` or `/`, otherwise reduce binary |
//! | `MulRhs`/`DivRhs`   | `Expression` | reduce binary                            |
//! | `Number`/`Variable` | atom         | reduce atomic                            |
//! | `Open`              | `(`          | primary; `Expression`→`Inner`            |
//! | `Inner`             | `Expression` | shift an operator or `)`                 |
//! | `Close`             | `)`          | reduce bracketed                         |
//! | `Accept`            | `Axiom`      | accept                                   |
//!
//! A primary position shifts a number, a variable or `(`.

use crate::{Atom, Axiom, Bracket, Expression, Symbol, SymbolKind};
use lr1::{Automaton, ParseError, ParserAction, ParserProdID, ParserStateID};

pub type CalcAction = ParserAction<State, ProdID>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    Top,
    AfterAdd,
    AfterSub,
    AfterMul,
    AfterDiv,
    AddRhs,
    SubRhs,
    MulRhs,
    DivRhs,
    Number,
    Variable,
    Open,
    Inner,
    Close,
    Accept,
}

impl ParserStateID for State {}

impl State {
    pub const ALL: [State; 16] = [
        State::Start,
        State::Top,
        State::AfterAdd,
        State::AfterSub,
        State::AfterMul,
        State::AfterDiv,
        State::AddRhs,
        State::SubRhs,
        State::MulRhs,
        State::DivRhs,
        State::Number,
        State::Variable,
        State::Open,
        State::Inner,
        State::Close,
        State::Accept,
    ];

    /// The action for `kind` as lookahead (terminals) or as a freshly
    /// reduced nonterminal (goto).
    pub fn action(self, kind: SymbolKind) -> CalcAction {
        use ParserAction::{Accept, Error, Reduce, Shift};
        match self {
            State::Start => match kind {
                SymbolKind::Axiom => Shift(State::Accept),
                kind => operand(kind, State::Top),
            },
            State::Top => match kind {
                SymbolKind::End => Reduce(ProdID::Axiom),
                kind => operator(kind).map_or(Error, Shift),
            },
            State::AfterAdd => operand(kind, State::AddRhs),
            State::AfterSub => operand(kind, State::SubRhs),
            State::AfterMul => operand(kind, State::MulRhs),
            State::AfterDiv => operand(kind, State::DivRhs),
            State::AddRhs | State::SubRhs => match kind {
                SymbolKind::Mul => Shift(State::AfterMul),
                SymbolKind::Div => Shift(State::AfterDiv),
                _ => Reduce(ProdID::Binary),
            },
            State::MulRhs | State::DivRhs => Reduce(ProdID::Binary),
            State::Number => Reduce(ProdID::Number),
            State::Variable => Reduce(ProdID::Variable),
            State::Open => operand(kind, State::Inner),
            State::Inner => match kind {
                SymbolKind::CloseBracket => Shift(State::Close),
                kind => operator(kind).map_or(Error, Shift),
            },
            State::Close => Reduce(ProdID::Bracketed),
            State::Accept => Accept,
        }
    }
}

/// Primary position: an operand may start here. `Expression` goes to `goto`.
fn operand(kind: SymbolKind, goto: State) -> CalcAction {
    match kind {
        SymbolKind::Number => ParserAction::Shift(State::Number),
        SymbolKind::Variable => ParserAction::Shift(State::Variable),
        SymbolKind::OpenBracket => ParserAction::Shift(State::Open),
        SymbolKind::Expression => ParserAction::Shift(goto),
        _ => ParserAction::Error,
    }
}

fn operator(kind: SymbolKind) -> Option<State> {
    match kind {
        SymbolKind::Add => Some(State::AfterAdd),
        SymbolKind::Sub => Some(State::AfterSub),
        SymbolKind::Mul => Some(State::AfterMul),
        SymbolKind::Div => Some(State::AfterDiv),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProdID {
    /// Axiom -> Expression
    Axiom,
    /// Expression -> number
    Number,
    /// Expression -> variable
    Variable,
    /// Expression -> Expression op Expression
    Binary,
    /// Expression -> ( Expression )
    Bracketed,
}

impl ParserProdID for ProdID {
    fn size(&self) -> usize {
        match self {
            ProdID::Axiom | ProdID::Number | ProdID::Variable => 1,
            ProdID::Binary | ProdID::Bracketed => 3,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ProdID::Axiom => "Axiom -> Expression",
            ProdID::Number => "Expression -> number",
            ProdID::Variable => "Expression -> variable",
            ProdID::Binary => "Expression -> Expression op Expression",
            ProdID::Bracketed => "Expression -> ( Expression )",
        }
    }
}

/// The calculator grammar: its table and its tree-building reductions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalcAutomaton;

fn take<const N: usize>(prod: ProdID, rhs: Vec<Symbol>) -> Result<[Symbol; N], ParseError> {
    rhs.try_into().map_err(|rhs: Vec<Symbol>| shape_mismatch(prod, &rhs))
}

fn shape_mismatch(prod: ProdID, rhs: &[Symbol]) -> ParseError {
    let found: Vec<_> = rhs.iter().map(|s| s.kind()).collect();
    ParseError::internal(format!("cannot reduce {} from {:?}", prod.label(), found))
}

impl Automaton for CalcAutomaton {
    type StateID = State;
    type ProdID = ProdID;
    type Symbol = Symbol;

    fn start_state(&self) -> State {
        State::Start
    }

    fn lookup(&self, state: State, kind: SymbolKind) -> CalcAction {
        state.action(kind)
    }

    fn reduce(&mut self, prod: ProdID, rhs: Vec<Symbol>) -> Result<Symbol, ParseError> {
        let lhs = match prod {
            ProdID::Axiom => match take::<1>(prod, rhs)? {
                [Symbol::Expression(expr)] => Symbol::Axiom(Axiom::new(expr)),
                rhs => return Err(shape_mismatch(prod, &rhs)),
            },
            ProdID::Number => match take::<1>(prod, rhs)? {
                [Symbol::Atom(atom @ Atom::Number(_))] => {
                    Symbol::Expression(Expression::atomic(atom))
                }
                rhs => return Err(shape_mismatch(prod, &rhs)),
            },
            ProdID::Variable => match take::<1>(prod, rhs)? {
                [Symbol::Atom(atom @ Atom::Variable(_))] => {
                    Symbol::Expression(Expression::atomic(atom))
                }
                rhs => return Err(shape_mismatch(prod, &rhs)),
            },
            ProdID::Binary => match take::<3>(prod, rhs)? {
                [Symbol::Expression(left), Symbol::Operator(op), Symbol::Expression(right)] => {
                    Symbol::Expression(Expression::binary(left, op, right))
                }
                rhs => return Err(shape_mismatch(prod, &rhs)),
            },
            ProdID::Bracketed => match take::<3>(prod, rhs)? {
                [
                    Symbol::Bracket(Bracket::Open),
                    Symbol::Expression(inner),
                    Symbol::Bracket(Bracket::Close),
                ] => Symbol::Expression(Expression::bracketed(inner)),
                rhs => return Err(shape_mismatch(prod, &rhs)),
            },
        };
        log::trace!("{} => {}", prod.label(), lhs);
        Ok(lhs)
    }
}
