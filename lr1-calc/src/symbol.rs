//! # Symbols and the expression tree
//!
//! [`Symbol`] is the closed sum type of everything that can sit on the parse
//! stack: the terminals produced by the lexer and the nonterminals built by
//! reductions. The expression tree ([`Expression`], [`Axiom`]) is made of
//! owned, immutable nodes; children are boxed and never shared.
//!
//! Every symbol renders itself with `text()`. Numeric symbols also evaluate
//! against a [`Bindings`] table; structural symbols (brackets, bare
//! operators, the end marker) refuse with [`EvalError::NotEvaluable`].
//!
//! ```rust
//! # use lr1_calc::{Axiom, Atom, BinaryOperator, Bindings, Expression};
//! let tree = Axiom::new(Expression::binary(
//!     Expression::atomic(Atom::Number(2.0)),
//!     BinaryOperator::Mul,
//!     Expression::bracketed(Expression::binary(
//!         Expression::atomic(Atom::variable("x")),
//!         BinaryOperator::Add,
//!         Expression::atomic(Atom::Number(0.5)),
//!     )),
//! ));
//! let bindings: Bindings = [("x", 1.0)].into_iter().collect();
//! assert_eq!(tree.text(), "2*(x+0.5)");
//! assert_eq!(tree.eval(&bindings).unwrap(), 3.0);
//! ```

use crate::{Bindings, EvalError};
use lr1::GrammarSymbol;
use smartstring::alias::String;
use std::{fmt, mem};

/// Kind tag of a [`Symbol`]; indexes the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    End,
    Number,
    Variable,
    OpenBracket,
    CloseBracket,
    Add,
    Sub,
    Mul,
    Div,
    Expression,
    Axiom,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 11] = [
        SymbolKind::End,
        SymbolKind::Number,
        SymbolKind::Variable,
        SymbolKind::OpenBracket,
        SymbolKind::CloseBracket,
        SymbolKind::Add,
        SymbolKind::Sub,
        SymbolKind::Mul,
        SymbolKind::Div,
        SymbolKind::Expression,
        SymbolKind::Axiom,
    ];

    pub fn is_terminal(self) -> bool {
        !matches!(self, SymbolKind::Expression | SymbolKind::Axiom)
    }
}

/// One of the four binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Sub),
            '*' => Some(BinaryOperator::Mul),
            '/' => Some(BinaryOperator::Div),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Sub => '-',
            BinaryOperator::Mul => '*',
            BinaryOperator::Div => '/',
        }
    }

    pub fn text(self) -> String {
        let mut s = String::new();
        s.push(self.as_char());
        s
    }

    pub fn kind(self) -> SymbolKind {
        match self {
            BinaryOperator::Add => SymbolKind::Add,
            BinaryOperator::Sub => SymbolKind::Sub,
            BinaryOperator::Mul => SymbolKind::Mul,
            BinaryOperator::Div => SymbolKind::Div,
        }
    }

    /// Plain IEEE arithmetic; division by zero yields infinity or NaN.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Sub => left - right,
            BinaryOperator::Mul => left * right,
            BinaryOperator::Div => left / right,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A literal operand: a number or a variable reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Number(f64),
    Variable(String),
}

impl Atom {
    pub fn variable(name: impl AsRef<str>) -> Self {
        Atom::Variable(String::from(name.as_ref()))
    }

    pub fn eval(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        match self {
            Atom::Number(value) => Ok(*value),
            Atom::Variable(name) => bindings.get(name),
        }
    }
}

/// Magnitude from which numbers render in exponent form (`1e16`).
const EXPONENT_FROM: f64 = 1e16;

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // shortest digits that read back to the same double; large
            // magnitudes switch to a positive exponent, which still lexes as
            // one numeral
            Atom::Number(value) if value.is_finite() && value.abs() >= EXPONENT_FROM => {
                write!(f, "{value:e}")
            }
            Atom::Number(value) => write!(f, "{value}"),
            Atom::Variable(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    Open,
    Close,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bracket::Open => "(",
            Bracket::Close => ")",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    left: Box<Expression>,
    op: BinaryOperator,
    right: Box<Expression>,
}

impl BinaryExpression {
    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn op(&self) -> BinaryOperator {
        self.op
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }
}

/// A parenthesized expression. The bracket tokens are kept so the node
/// renders exactly as it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketedExpression {
    open: Bracket,
    inner: Box<Expression>,
    close: Bracket,
}

impl BracketedExpression {
    pub fn inner(&self) -> &Expression {
        &self.inner
    }
}

/// An expression node.
///
/// Trees can be as deep as the input is long, so evaluation, rendering,
/// comparison, cloning and dropping all walk the tree with an explicit
/// stack instead of recursing.
#[derive(Debug)]
pub enum Expression {
    Atomic(Atom),
    Binary(BinaryExpression),
    Bracketed(BracketedExpression),
}

/// Post-order step over a borrowed tree.
enum Visit<'a> {
    Enter(&'a Expression),
    Leave(&'a Expression),
}

/// In-order rendering step.
enum Piece<'a> {
    Node(&'a Expression),
    Operator(BinaryOperator),
    Bracket(Bracket),
}

impl Expression {
    pub fn atomic(atom: Atom) -> Self {
        Expression::Atomic(atom)
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn bracketed(inner: Expression) -> Self {
        Expression::Bracketed(BracketedExpression {
            open: Bracket::Open,
            inner: Box::new(inner),
            close: Bracket::Close,
        })
    }

    pub fn text(&self) -> String {
        self.to_string().into()
    }

    /// Evaluates left to right; the first unbound variable aborts.
    pub fn eval(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        self.fold(|atom| atom.eval(bindings), |l, op, r| Ok(op.apply(l, r)), Ok)
    }

    /// Bottom-up fold: `leaf` maps atoms, `binary` combines two operands and
    /// `bracketed` wraps an inner value. Leaves are visited left to right.
    fn fold<T, E>(
        &self,
        mut leaf: impl FnMut(&Atom) -> Result<T, E>,
        mut binary: impl FnMut(T, BinaryOperator, T) -> Result<T, E>,
        mut bracketed: impl FnMut(T) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut work = vec![Visit::Enter(self)];
        let mut values = Vec::new();
        while let Some(step) = work.pop() {
            match step {
                Visit::Enter(expr) => match expr {
                    Expression::Atomic(atom) => values.push(leaf(atom)?),
                    Expression::Binary(b) => {
                        work.push(Visit::Leave(expr));
                        work.push(Visit::Enter(&b.right));
                        work.push(Visit::Enter(&b.left));
                    }
                    Expression::Bracketed(b) => {
                        work.push(Visit::Leave(expr));
                        work.push(Visit::Enter(&b.inner));
                    }
                },
                Visit::Leave(Expression::Binary(b)) => {
                    let (Some(right), Some(left)) = (values.pop(), values.pop()) else {
                        unreachable!("binary node without two operands")
                    };
                    values.push(binary(left, b.op, right)?);
                }
                Visit::Leave(Expression::Bracketed(_)) => {
                    let Some(inner) = values.pop() else {
                        unreachable!("bracketed node without an operand")
                    };
                    values.push(bracketed(inner)?);
                }
                Visit::Leave(Expression::Atomic(_)) => {}
            }
        }
        let Some(value) = values.pop() else {
            unreachable!("fold produced no value")
        };
        Ok(value)
    }

    /// Moves non-leaf children into `out`, leaving leaves in their place.
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        let mut detach = |child: &mut Box<Expression>| {
            if !matches!(**child, Expression::Atomic(_)) {
                out.push(mem::replace(&mut **child, Expression::Atomic(Atom::Number(0.0))));
            }
        };
        match self {
            Expression::Atomic(_) => {}
            Expression::Binary(b) => {
                detach(&mut b.left);
                detach(&mut b.right);
            }
            Expression::Bracketed(b) => detach(&mut b.inner),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut work = vec![Piece::Node(self)];
        while let Some(piece) = work.pop() {
            match piece {
                Piece::Node(Expression::Atomic(atom)) => write!(f, "{atom}")?,
                Piece::Node(Expression::Binary(b)) => {
                    work.push(Piece::Node(&b.right));
                    work.push(Piece::Operator(b.op));
                    work.push(Piece::Node(&b.left));
                }
                Piece::Node(Expression::Bracketed(b)) => {
                    work.push(Piece::Bracket(b.close));
                    work.push(Piece::Node(&b.inner));
                    work.push(Piece::Bracket(b.open));
                }
                Piece::Operator(op) => write!(f, "{op}")?,
                Piece::Bracket(bracket) => write!(f, "{bracket}")?,
            }
        }
        Ok(())
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Expression::Atomic(a), Expression::Atomic(b)) if a == b => {}
                (Expression::Binary(a), Expression::Binary(b)) if a.op == b.op => {
                    pending.push((&*a.right, &*b.right));
                    pending.push((&*a.left, &*b.left));
                }
                (Expression::Bracketed(a), Expression::Bracketed(b))
                    if a.open == b.open && a.close == b.close =>
                {
                    pending.push((&*a.inner, &*b.inner));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        let copy: Result<Self, std::convert::Infallible> = self.fold(
            |atom| Ok(Expression::Atomic(atom.clone())),
            |left, op, right| Ok(Expression::binary(left, op, right)),
            |inner| Ok(Expression::bracketed(inner)),
        );
        match copy {
            Ok(copy) => copy,
            Err(never) => match never {},
        }
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut expr) = detached.pop() {
            expr.detach_children(&mut detached);
        }
    }
}

/// The root of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Axiom {
    expression: Expression,
}

impl Axiom {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn text(&self) -> String {
        self.expression.text()
    }

    pub fn eval(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        self.expression.eval(bindings)
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// A parse-stack element.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// End-of-input marker.
    End,
    /// Number or variable token.
    Atom(Atom),
    Bracket(Bracket),
    Operator(BinaryOperator),
    Expression(Expression),
    Axiom(Axiom),
}

impl Symbol {
    pub fn number(value: f64) -> Self {
        Symbol::Atom(Atom::Number(value))
    }

    pub fn variable(name: impl AsRef<str>) -> Self {
        Symbol::Atom(Atom::variable(name))
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::End => SymbolKind::End,
            Symbol::Atom(Atom::Number(_)) => SymbolKind::Number,
            Symbol::Atom(Atom::Variable(_)) => SymbolKind::Variable,
            Symbol::Bracket(Bracket::Open) => SymbolKind::OpenBracket,
            Symbol::Bracket(Bracket::Close) => SymbolKind::CloseBracket,
            Symbol::Operator(op) => op.kind(),
            Symbol::Expression(_) => SymbolKind::Expression,
            Symbol::Axiom(_) => SymbolKind::Axiom,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    pub fn text(&self) -> String {
        self.to_string().into()
    }

    pub fn eval(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        match self {
            Symbol::Atom(atom) => atom.eval(bindings),
            Symbol::Expression(expr) => expr.eval(bindings),
            Symbol::Axiom(axiom) => axiom.eval(bindings),
            Symbol::End | Symbol::Bracket(_) | Symbol::Operator(_) => {
                Err(EvalError::NotEvaluable(self.text()))
            }
        }
    }

    pub fn into_axiom(self) -> Option<Axiom> {
        match self {
            Symbol::Axiom(axiom) => Some(axiom),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::End => f.write_str("$"),
            Symbol::Atom(atom) => write!(f, "{atom}"),
            Symbol::Bracket(bracket) => write!(f, "{bracket}"),
            Symbol::Operator(op) => write!(f, "{op}"),
            Symbol::Expression(expr) => write!(f, "{expr}"),
            Symbol::Axiom(axiom) => write!(f, "{axiom}"),
        }
    }
}

impl GrammarSymbol for Symbol {
    type Kind = SymbolKind;

    fn kind(&self) -> SymbolKind {
        Symbol::kind(self)
    }

    fn is_terminal(&self) -> bool {
        Symbol::is_terminal(self)
    }

    fn is_end(&self) -> bool {
        matches!(self, Symbol::End)
    }

    fn text(&self) -> String {
        Symbol::text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Expression {
        Expression::atomic(Atom::Number(v))
    }

    fn var(name: &str) -> Expression {
        Expression::atomic(Atom::variable(name))
    }

    #[test]
    fn numbers_render_in_minimal_form() {
        assert_eq!(Symbol::number(2.0).text(), "2");
        assert_eq!(Symbol::number(0.5).text(), "0.5");
        assert_eq!(Symbol::number(1.25).text(), "1.25");
        assert_eq!(Symbol::number(100000.0).text(), "100000");
        assert_eq!(Symbol::number(0.1 + 0.2).text(), "0.30000000000000004");
        assert_eq!(Symbol::number(9007199254740992.0).text(), "9007199254740992");
        assert_eq!(Symbol::number(0.000001).text(), "0.000001");
    }

    #[test]
    fn large_numbers_render_with_exponent() {
        assert_eq!(Symbol::number(1e16).text(), "1e16");
        assert_eq!(Symbol::number(1e300).text(), "1e300");
        assert_eq!(
            Symbol::number(123456789012345678901234567890.0).text(),
            "1.2345678901234568e29"
        );
        assert_eq!(Symbol::number(f64::MAX).text(), "1.7976931348623157e308");
        for value in [1e16, 1e300, 123456789012345678901234567890.0, f64::MAX] {
            let text = Symbol::number(value).text();
            assert_eq!(text.parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn binary_expression_renders_without_added_parens() {
        let e = Expression::binary(
            var("a"),
            BinaryOperator::Sub,
            Expression::binary(num(3.0), BinaryOperator::Div, var("b")),
        );
        assert_eq!(e.text(), "a-3/b");
        assert_eq!(e.to_string(), "a-3/b");
    }

    #[test]
    fn bracketed_expression_keeps_brackets() {
        let e = Expression::binary(
            Expression::bracketed(Expression::binary(num(2.0), BinaryOperator::Add, num(3.0))),
            BinaryOperator::Mul,
            num(4.0),
        );
        assert_eq!(e.text(), "(2+3)*4");
        assert_eq!(e.eval(&Bindings::new()).unwrap(), 20.0);
    }

    #[test]
    fn eval_looks_up_variables() {
        let mut b = Bindings::new();
        b.set("x", 4.0);
        let e = Expression::binary(var("x"), BinaryOperator::Add, num(1.0));
        assert_eq!(e.eval(&b).unwrap(), 5.0);

        let err = e.eval(&Bindings::new()).unwrap_err();
        assert_eq!(err, EvalError::UnboundVariable("x".into()));
    }

    #[test]
    fn unbound_right_operand_aborts_whole_evaluation() {
        let e = Expression::binary(num(1.0), BinaryOperator::Add, var("missing"));
        assert!(matches!(
            e.eval(&Bindings::new()),
            Err(EvalError::UnboundVariable(name)) if name.as_str() == "missing"
        ));
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        let b = Bindings::new();
        let inf = Expression::binary(num(1.0), BinaryOperator::Div, num(0.0));
        assert_eq!(inf.eval(&b).unwrap(), f64::INFINITY);

        let neg = Expression::binary(num(-0.0), BinaryOperator::Sub, num(1.0));
        let neg_inf = Expression::binary(neg, BinaryOperator::Div, num(0.0));
        assert_eq!(neg_inf.eval(&b).unwrap(), f64::NEG_INFINITY);

        let nan = Expression::binary(num(0.0), BinaryOperator::Div, num(0.0));
        assert!(nan.eval(&b).unwrap().is_nan());
    }

    #[test]
    fn structural_symbols_are_not_evaluable() {
        let b = Bindings::new();
        for sym in [
            Symbol::End,
            Symbol::Bracket(Bracket::Open),
            Symbol::Bracket(Bracket::Close),
            Symbol::Operator(BinaryOperator::Mul),
        ] {
            let err = sym.eval(&b).unwrap_err();
            assert_eq!(err, EvalError::NotEvaluable(sym.text()));
        }
        assert_eq!(Symbol::number(7.0).eval(&b).unwrap(), 7.0);
    }

    #[test]
    fn kinds_and_terminal_flags() {
        assert_eq!(Symbol::End.kind(), SymbolKind::End);
        assert_eq!(Symbol::number(1.0).kind(), SymbolKind::Number);
        assert_eq!(Symbol::variable("v").kind(), SymbolKind::Variable);
        assert_eq!(Symbol::Operator(BinaryOperator::Div).kind(), SymbolKind::Div);
        assert_eq!(Symbol::Bracket(Bracket::Close).kind(), SymbolKind::CloseBracket);
        assert!(Symbol::variable("v").is_terminal());
        assert!(!Symbol::Expression(num(1.0)).is_terminal());
        assert!(!Symbol::Axiom(Axiom::new(num(1.0))).is_terminal());
        assert_eq!(
            SymbolKind::ALL.iter().filter(|k| k.is_terminal()).count(),
            9
        );
    }

    #[test]
    fn operators_round_trip_through_chars() {
        for op in [
            BinaryOperator::Add,
            BinaryOperator::Sub,
            BinaryOperator::Mul,
            BinaryOperator::Div,
        ] {
            assert_eq!(BinaryOperator::from_char(op.as_char()), Some(op));
        }
        assert_eq!(BinaryOperator::from_char('%'), None);
        assert_eq!(BinaryOperator::Div.text(), "/");
        assert_eq!(BinaryOperator::Sub.apply(8.0, 3.0), 5.0);
    }

    fn left_deep_sum(terms: usize) -> Expression {
        (1..terms).fold(num(1.0), |acc, _| {
            Expression::binary(acc, BinaryOperator::Add, num(1.0))
        })
    }

    fn nested_brackets(depth: usize) -> Expression {
        (0..depth).fold(var("x"), |acc, _| Expression::bracketed(acc))
    }

    #[test]
    fn deep_trees_evaluate_render_and_drop() {
        const TERMS: usize = 200_000;
        let sum = left_deep_sum(TERMS);
        assert_eq!(sum.eval(&Bindings::new()).unwrap(), TERMS as f64);
        let text = sum.text();
        assert_eq!(text.len(), 2 * TERMS - 1);
        assert!(text.starts_with("1+1+") && text.ends_with("+1"));
        drop(sum);

        let nested = nested_brackets(TERMS);
        let b: Bindings = [("x", 3.0)].into_iter().collect();
        assert_eq!(nested.eval(&b).unwrap(), 3.0);
        assert_eq!(nested.text().len(), 2 * TERMS + 1);
        assert_eq!(
            nested.eval(&Bindings::new()),
            Err(EvalError::UnboundVariable("x".into()))
        );
    }

    #[test]
    fn deep_trees_compare_and_clone() {
        let sum = left_deep_sum(200_000);
        let copy = sum.clone();
        assert!(copy == sum);
        assert!(copy != left_deep_sum(199_999));

        let nested = nested_brackets(200_000);
        assert!(nested.clone() == nested);
        assert!(nested != nested_brackets(200_001));
    }

    #[test]
    fn comparison_looks_at_every_node() {
        let a = Expression::binary(var("a"), BinaryOperator::Add, num(1.0));
        let b = Expression::binary(var("a"), BinaryOperator::Sub, num(1.0));
        let c = Expression::binary(var("a"), BinaryOperator::Add, num(2.0));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Expression::bracketed(a.clone()));
    }

    #[test]
    fn evaluation_reports_leftmost_unbound_variable() {
        let e = Expression::binary(
            Expression::bracketed(Expression::binary(num(1.0), BinaryOperator::Mul, var("p"))),
            BinaryOperator::Add,
            var("q"),
        );
        assert_eq!(
            e.eval(&Bindings::new()),
            Err(EvalError::UnboundVariable("p".into()))
        );
    }

    fn _assert_send_sync<T: Send + Sync>() {}
    #[test]
    fn trees_and_bindings_are_send_sync() {
        _assert_send_sync::<Axiom>();
        _assert_send_sync::<Symbol>();
        _assert_send_sync::<Bindings>();
    }

    #[test]
    fn into_axiom_only_for_axioms() {
        let axiom = Axiom::new(var("q"));
        assert_eq!(Symbol::Axiom(axiom.clone()).into_axiom(), Some(axiom));
        assert_eq!(Symbol::Expression(var("q")).into_axiom(), None);
    }
}
