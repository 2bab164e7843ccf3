//! A small boolean predicate language over string variables.
//!
//! ```
//! use predlang_core::{evaluate, parse_predicate, Variables};
//!
//! let predicate = parse_predicate("kind in {street, district} and country == 'TR'").unwrap();
//!
//! let mut vars = Variables::new();
//! vars.insert("kind".to_string(), "street".to_string());
//! vars.insert("country".to_string(), "TR".to_string());
//! assert!(evaluate(&predicate, &vars));
//! ```

pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod predicate;

// Test utilities (available in tests and when used as a dependency with dev profile)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use ast::{Expression, Set, Term};
pub use interpreter::{Environment, Variables};
pub use parser::{ParseError, ParseResult, Parser};
pub use predicate::Predicate;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compile predicate text.
///
/// Fails on any syntax error or unconsumed trailing text; there is no
/// partial result.
pub fn parse_predicate(source: &str) -> ParseResult<Predicate> {
    Predicate::parse(source)
}

/// Evaluate a compiled predicate. Unbound variables read as empty strings.
pub fn evaluate<E: Environment + ?Sized>(predicate: &Predicate, variables: &E) -> bool {
    predicate.evaluate(variables)
}
