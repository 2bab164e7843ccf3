//! Predicate language parser
//!
//! A scannerless recursive-descent parser with backtracking.

pub mod lexer;
pub mod parse;
pub mod token;

pub use lexer::Lexer;
pub use parse::{ParseError, ParseResult, Parser, DEFAULT_MAX_DEPTH};
pub use token::Symbol;
