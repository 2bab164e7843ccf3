//! Fixed symbols of the predicate language

use std::fmt;

/// A punctuation mark, operator or keyword the parser matches verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    // Keywords
    And,
    Or,
    Not,
    In,

    // Comparison operators
    Eq,  // ==
    Neq, // !=

    // Punctuation
    Comma,  // ,
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
}

impl Symbol {
    /// Source text of this symbol
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::And => "and",
            Symbol::Or => "or",
            Symbol::Not => "not",
            Symbol::In => "in",
            Symbol::Eq => "==",
            Symbol::Neq => "!=",
            Symbol::Comma => ",",
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::LBrace => "{",
            Symbol::RBrace => "}",
        }
    }

    /// Check if this symbol is a keyword.
    ///
    /// Keywords only match when they are not immediately followed by
    /// another word character.
    pub fn is_keyword(self) -> bool {
        matches!(self, Symbol::And | Symbol::Or | Symbol::Not | Symbol::In)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a byte may appear inside an identifier or bare literal
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
