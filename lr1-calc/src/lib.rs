//! # lr1-calc
//!
//! An arithmetic-expression language built on the **lr1** engine: a lexer,
//! a hand-derived shift-reduce table and an immutable syntax tree that can
//! render itself back to text and evaluate against variable bindings.
//!
//! The language has numbers, variables, the four binary operators with the
//! usual precedence (`*` and `/` bind tighter than `+` and `-`, all
//! left-associative) and round brackets. There is no unary minus.
//!
//! ## Example
//!
//! ```rust
//! use lr1_calc::{Bindings, CalcParser, parse};
//!
//! let axiom = parse("(x + 1) * 2").unwrap();
//! assert_eq!(axiom.text(), "(x+1)*2");
//!
//! let env: Bindings = [("x", 4.0)].into_iter().collect();
//! assert_eq!(axiom.eval(&env).unwrap(), 10.0);
//!
//! // recovery keeps going but never hands back a tree
//! let analysis = CalcParser::new("1 + + 2".chars()).analyze();
//! assert_eq!(analysis.diagnostics.len(), 1);
//! assert!(analysis.into_result().is_none());
//! ```
//!
//! ## Modules
//!
//! - [`symbol`]: symbols, tree nodes, `text()` and `eval()`
//! - [`lexer`]: characters to tokens
//! - [`states`]: the action table and the reductions
//! - [`parser`]: the parse facade
//! - [`bindings`]: the variable environment
pub mod bindings;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod states;
pub mod symbol;


pub use bindings::Bindings;
pub use error::{CalcError, EvalError};
pub use lexer::CalcLexer;
pub use parser::{CalcParser, evaluate, parse};
pub use states::{CalcAutomaton, ProdID, State};
pub use symbol::{
    Atom, Axiom, BinaryExpression, BinaryOperator, Bracket, BracketedExpression, Expression,
    Symbol, SymbolKind,
};

pub use lr1::{Analysis, ErrorMode, Outcome, ParseError, ParseErrorKind};
