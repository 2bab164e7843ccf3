//! Lexical primitives for the predicate language
//!
//! There is no separate token stream. Each primitive skips leading
//! whitespace and matches directly at the cursor, so the grammar decides
//! whether a bare word is a variable name or a literal. A primitive that
//! fails leaves the cursor where it found it.

use super::token::{is_word_byte, Symbol};

/// Cursor over predicate source text
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    furthest: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer positioned at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            furthest: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor back to a previously saved offset
    pub fn reset(&mut self, position: usize) {
        self.position = position;
    }

    /// Furthest byte offset at which any primitive failed to match
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    /// Full source text
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Unconsumed source text
    pub fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Check if the whole input has been consumed
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Advance past whitespace
    pub fn skip_spaces(&mut self) {
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() || byte == 0x0b {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Match `symbol` verbatim after optional whitespace
    ///
    /// Unlike punctuation, a keyword also needs a word boundary after it:
    /// `notfallback` is one identifier, not `not fallback`.
    pub fn eat(&mut self, symbol: Symbol) -> bool {
        let start = self.position;
        self.skip_spaces();

        let text = symbol.as_str();
        let matched = self.remaining().starts_with(text)
            && !(symbol.is_keyword()
                && self.byte_at(self.position + text.len()).map_or(false, is_word_byte));

        if matched {
            self.position += text.len();
            true
        } else {
            self.miss(start);
            false
        }
    }

    /// Match an identifier: an ASCII letter followed by letters, digits or
    /// underscores
    pub fn identifier(&mut self) -> Option<&'a str> {
        let start = self.position;
        self.skip_spaces();

        if !self.peek().map_or(false, |byte| byte.is_ascii_alphabetic()) {
            self.miss(start);
            return None;
        }

        let begin = self.position;
        self.skip_word();
        Some(&self.input[begin..self.position])
    }

    /// Match a literal: either text between single quotes (no escapes) or a
    /// bare run of letters, digits and underscores
    pub fn literal(&mut self) -> Option<&'a str> {
        let start = self.position;
        self.skip_spaces();

        if self.peek() == Some(b'\'') {
            let begin = self.position + 1;
            return match self.input[begin..].find('\'') {
                Some(len) => {
                    self.position = begin + len + 1;
                    Some(&self.input[begin..begin + len])
                }
                None => {
                    // Unterminated: the failure is at end of input
                    self.position = self.input.len();
                    self.miss(start);
                    None
                }
            };
        }

        let begin = self.position;
        self.skip_word();
        if self.position == begin {
            self.miss(start);
            None
        } else {
            Some(&self.input[begin..self.position])
        }
    }

    fn peek(&self) -> Option<u8> {
        self.byte_at(self.position)
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(offset).copied()
    }

    fn skip_word(&mut self) {
        while self.peek().map_or(false, is_word_byte) {
            self.position += 1;
        }
    }

    /// Record a failed match at the current offset and rewind to `start`
    fn miss(&mut self, start: usize) {
        self.furthest = self.furthest.max(self.position);
        self.position = start;
    }
}
