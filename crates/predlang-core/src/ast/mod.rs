//! Abstract Syntax Tree (AST) for predicates
//!
//! The AST is the parsed, immutable form of a predicate. It is evaluated
//! directly by the interpreter.

pub mod nodes;
pub mod visitor;

pub use nodes::{Expression, Set, Term};
pub use visitor::{walk_expression, Visitor};
