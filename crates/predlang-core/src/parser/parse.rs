//! Parser implementation for predicates
//!
//! Grammar, lowest to highest binding:
//!
//! ```text
//! expression := or_expr
//! or_expr    := and_expr ( 'or' and_expr )*
//! and_expr   := not_expr ( 'and' not_expr )*
//! not_expr   := 'not'* ( comparison | '(' expression ')' )
//! comparison := term ( '==' term | '!=' term | 'in' set | 'not' 'in' set )?
//! term       := IDENTIFIER | LITERAL
//! set        := '{' ( LITERAL ( ',' LITERAL )* )? '}'
//! ```
//!
//! Chains of `and` / `or` group to the right. Every rule either matches and
//! leaves the lexer after its text, or fails and rewinds the lexer to where
//! the rule started.

use super::lexer::Lexer;
use super::token::Symbol;
use crate::ast::nodes::{Expression, Set, Term};
use crate::predicate::Predicate;
use thiserror::Error;

/// Default limit on parenthesis nesting
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parse error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected {found} at offset {offset}")]
    UnexpectedInput { offset: usize, found: String },

    #[error("Unexpected trailing {found} at offset {offset}")]
    TrailingInput { offset: usize, found: String },

    #[error("Parentheses nested deeper than {max_depth} levels")]
    NestingTooDeep { max_depth: usize },
}

impl ParseError {
    /// Byte offset the error points at, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedInput { offset, .. } | ParseError::TrailingInput { offset, .. } => {
                Some(*offset)
            }
            ParseError::NestingTooDeep { .. } => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parser for predicates
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
    max_depth: usize,
    too_deep: bool,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source text
    pub fn new(source: &'a str) -> Self {
        Self::with_max_depth(source, DEFAULT_MAX_DEPTH)
    }

    /// Create a parser with a custom limit on parenthesis nesting
    pub fn with_max_depth(source: &'a str, max_depth: usize) -> Self {
        Self {
            lexer: Lexer::new(source),
            depth: 0,
            max_depth,
            too_deep: false,
        }
    }

    /// Parse a complete predicate.
    ///
    /// Succeeds only if the expression covers the whole input, apart from
    /// trailing whitespace.
    pub fn parse_predicate(&mut self) -> ParseResult<Predicate> {
        let expr = self.parse_expression();

        if self.too_deep {
            return Err(ParseError::NestingTooDeep { max_depth: self.max_depth });
        }

        let Some(expr) = expr else {
            let offset = self.lexer.furthest();
            return Err(ParseError::UnexpectedInput {
                offset,
                found: describe(&self.lexer.input()[offset..]),
            });
        };

        self.lexer.skip_spaces();
        if !self.lexer.is_at_end() {
            return Err(ParseError::TrailingInput {
                offset: self.lexer.position(),
                found: describe(self.lexer.remaining()),
            });
        }

        Ok(Predicate::new(expr))
    }

    /// Parse an expression at the current position
    pub fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Option<Expression> {
        self.parse_chain(Symbol::Or, Self::parse_logical_and, Expression::or)
    }

    fn parse_logical_and(&mut self) -> Option<Expression> {
        self.parse_chain(Symbol::And, Self::parse_not_expression, Expression::and)
    }

    /// `operand (op operand)*`, folded into right-grouped pairs. A dangling
    /// operator fails the whole chain.
    fn parse_chain(
        &mut self,
        op: Symbol,
        operand: fn(&mut Self) -> Option<Expression>,
        join: fn(Expression, Expression) -> Expression,
    ) -> Option<Expression> {
        let start = self.lexer.position();
        let mut operands = Vec::new();

        loop {
            match operand(self) {
                Some(expr) => operands.push(expr),
                None => {
                    self.lexer.reset(start);
                    return None;
                }
            }
            if !self.lexer.eat(op) {
                break;
            }
        }

        let mut operands = operands.into_iter().rev();
        let last = operands.next()?;
        Some(operands.fold(last, |right, left| join(left, right)))
    }

    fn parse_not_expression(&mut self) -> Option<Expression> {
        let start = self.lexer.position();

        let mut negated = false;
        while self.lexer.eat(Symbol::Not) {
            negated = !negated;
        }

        let expr = match self.parse_comparison() {
            Some(expr) => Some(expr),
            None => self.parse_group(),
        };

        match expr {
            Some(expr) if negated => Some(Expression::not(expr)),
            Some(expr) => Some(expr),
            None => {
                self.lexer.reset(start);
                None
            }
        }
    }

    fn parse_group(&mut self) -> Option<Expression> {
        let start = self.lexer.position();
        if !self.lexer.eat(Symbol::LParen) {
            return None;
        }

        if self.depth >= self.max_depth {
            self.too_deep = true;
            self.lexer.reset(start);
            return None;
        }

        self.depth += 1;
        let inner = self.parse_expression();
        self.depth -= 1;

        match inner {
            Some(expr) if self.lexer.eat(Symbol::RParen) => Some(expr),
            _ => {
                self.lexer.reset(start);
                None
            }
        }
    }

    fn parse_comparison(&mut self) -> Option<Expression> {
        let start = self.lexer.position();
        let left = self.parse_term()?;

        // Once an operator is consumed its right-hand side is mandatory
        let expr = if self.lexer.eat(Symbol::Eq) {
            self.parse_term().map(|right| Expression::Equal(left, right))
        } else if self.lexer.eat(Symbol::Neq) {
            self.parse_term().map(|right| Expression::NotEqual(left, right))
        } else if self.lexer.eat(Symbol::In) {
            self.parse_set().map(|set| Expression::In(left, set))
        } else if self.lexer.eat(Symbol::Not) {
            if self.lexer.eat(Symbol::In) {
                self.parse_set().map(|set| Expression::NotIn(left, set))
            } else {
                None
            }
        } else {
            Some(Expression::Truthy(left))
        };

        if expr.is_none() {
            self.lexer.reset(start);
        }
        expr
    }

    /// A bare word here is a variable; only quoted text (or a word starting
    /// with a digit) is a literal.
    fn parse_term(&mut self) -> Option<Term> {
        if let Some(name) = self.lexer.identifier() {
            return Some(Term::Variable(name.to_string()));
        }
        self.lexer.literal().map(|value| Term::Literal(value.to_string()))
    }

    /// Set elements are always literals, bare words included.
    fn parse_set(&mut self) -> Option<Set> {
        let start = self.lexer.position();
        let set = self.parse_set_body();
        if set.is_none() {
            self.lexer.reset(start);
        }
        set
    }

    fn parse_set_body(&mut self) -> Option<Set> {
        if !self.lexer.eat(Symbol::LBrace) {
            return None;
        }

        let mut set = Set::new();
        if let Some(first) = self.lexer.literal() {
            set.insert(first.to_string());
            while self.lexer.eat(Symbol::Comma) {
                set.insert(self.lexer.literal()?.to_string());
            }
        }

        self.lexer.eat(Symbol::RBrace).then_some(set)
    }
}

fn describe(rest: &str) -> String {
    if rest.is_empty() {
        "end of input".to_string()
    } else {
        let snippet: String = rest.chars().take(16).collect();
        format!("input '{}'", snippet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        Parser::new(source)
            .parse_predicate()
            .unwrap_or_else(|e| panic!("{:?} failed to parse: {}", source, e))
            .into_expression()
    }

    fn parse_err(source: &str) -> ParseError {
        match Parser::new(source).parse_predicate() {
            Ok(p) => panic!("{:?} unexpectedly parsed as {}", source, p),
            Err(e) => e,
        }
    }

    fn var(name: &str) -> Term {
        Term::variable(name)
    }

    fn lit(value: &str) -> Term {
        Term::literal(value)
    }

    fn truthy(name: &str) -> Expression {
        Expression::Truthy(var(name))
    }

    #[test]
    fn test_parse_equal() {
        assert_eq!(parse("a == 'x'"), Expression::Equal(var("a"), lit("x")));
    }

    #[test]
    fn test_parse_not_equal() {
        assert_eq!(parse("'x'!=a"), Expression::NotEqual(lit("x"), var("a")));
    }

    #[test]
    fn test_bare_word_term_is_variable() {
        assert_eq!(parse("a == b"), Expression::Equal(var("a"), var("b")));
    }

    #[test]
    fn test_digit_word_term_is_literal() {
        assert_eq!(parse("x == 42"), Expression::Equal(var("x"), lit("42")));
    }

    #[test]
    fn test_parse_in_quoted_set() {
        assert_eq!(
            parse("kind in {'street', 'district', 'locality'}"),
            Expression::in_set(var("kind"), ["street", "district", "locality"])
        );
    }

    #[test]
    fn test_bare_set_elements_are_literals() {
        assert_eq!(
            parse("kind in { street, 'ab cd', 10 }"),
            Expression::in_set(var("kind"), ["street", "ab cd", "10"])
        );
    }

    #[test]
    fn test_parse_not_in() {
        assert_eq!(
            parse("kind not in {a}"),
            Expression::not_in_set(var("kind"), ["a"])
        );
    }

    #[test]
    fn test_parse_empty_set() {
        assert_eq!(
            parse("  kind   in  {  }  "),
            Expression::In(var("kind"), Set::new())
        );
    }

    #[test]
    fn test_parse_truthy() {
        assert_eq!(parse("fallback"), truthy("fallback"));
        assert_eq!(parse("'yes'"), Expression::Truthy(lit("yes")));
    }

    #[test]
    fn test_not_toggles() {
        assert_eq!(parse("not fallback"), Expression::not(truthy("fallback")));
        assert_eq!(parse("not not fallback"), truthy("fallback"));
        assert_eq!(parse("not not not fallback"), Expression::not(truthy("fallback")));
    }

    #[test]
    fn test_not_binds_tighter_than_and() {
        assert_eq!(
            parse("not a and b"),
            Expression::and(Expression::not(truthy("a")), truthy("b"))
        );
    }

    #[test]
    fn test_not_applies_to_whole_comparison() {
        assert_eq!(
            parse("not a in {x}"),
            Expression::not(Expression::in_set(var("a"), ["x"]))
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse("a or b and c"),
            Expression::or(truthy("a"), Expression::and(truthy("b"), truthy("c")))
        );
        assert_eq!(
            parse("a and b or c"),
            Expression::or(Expression::and(truthy("a"), truthy("b")), truthy("c"))
        );
    }

    #[test]
    fn test_chains_group_to_the_right() {
        assert_eq!(
            parse("a and b and c"),
            Expression::and(truthy("a"), Expression::and(truthy("b"), truthy("c")))
        );
        assert_eq!(
            parse("a or b or c"),
            Expression::or(truthy("a"), Expression::or(truthy("b"), truthy("c")))
        );
    }

    #[test]
    fn test_parenthesized_group() {
        assert_eq!(
            parse("(a or b) and c"),
            Expression::and(Expression::or(truthy("a"), truthy("b")), truthy("c"))
        );
        assert_eq!(
            parse("not (a == 'x')"),
            Expression::not(Expression::Equal(var("a"), lit("x")))
        );
        assert_eq!(parse("((a))"), truthy("a"));
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(
            parse("\tnot(a=='x')or\nb in{c}"),
            parse("not (a == 'x') or b in {c}")
        );
    }

    #[test]
    fn test_keyword_prefixed_identifiers() {
        assert_eq!(parse("note == 'x'"), Expression::Equal(var("note"), lit("x")));
        assert_eq!(parse("index"), truthy("index"));
        assert_eq!(
            parse("a and order"),
            Expression::and(truthy("a"), truthy("order"))
        );
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        let err = parse_err("a == 'x' or (");
        assert_eq!(
            err,
            ParseError::UnexpectedInput { offset: 13, found: "end of input".to_string() }
        );
        assert!(matches!(parse_err("(a"), ParseError::UnexpectedInput { .. }));
    }

    #[test]
    fn test_trailing_input() {
        let err = parse_err("a == 'x' )");
        assert_eq!(
            err,
            ParseError::TrailingInput { offset: 9, found: "input ')'".to_string() }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            parse_err(""),
            ParseError::UnexpectedInput { offset: 0, found: "end of input".to_string() }
        );
        assert_eq!(parse_err("   ").offset(), Some(3));
    }

    #[test]
    fn test_operator_requires_operand() {
        // A consumed operator never falls back to a truthiness test
        assert!(matches!(parse_err("a =="), ParseError::UnexpectedInput { .. }));
        assert!(matches!(parse_err("a != {x}"), ParseError::UnexpectedInput { .. }));
        assert!(matches!(parse_err("a in b"), ParseError::UnexpectedInput { .. }));
        assert!(matches!(parse_err("a not b"), ParseError::UnexpectedInput { .. }));
    }

    #[test]
    fn test_dangling_logical_operator() {
        assert!(parse_err("a and").offset().is_some());
        assert!(parse_err("a or").offset().is_some());
        assert!(parse_err("not").offset().is_some());
    }

    #[test]
    fn test_malformed_sets() {
        assert!(matches!(parse_err("kind in {a"), ParseError::UnexpectedInput { .. }));
        assert!(matches!(parse_err("kind in {a,}"), ParseError::UnexpectedInput { .. }));
        assert!(matches!(parse_err("kind in {,a}"), ParseError::UnexpectedInput { .. }));
        assert!(matches!(parse_err("kind in {a b}"), ParseError::UnexpectedInput { .. }));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_err("a == 'x");
        assert_eq!(
            err,
            ParseError::UnexpectedInput { offset: 7, found: "end of input".to_string() }
        );
    }

    #[test]
    fn test_no_escape_in_quotes() {
        // The first quote after the opening one always closes the literal
        assert!(matches!(parse_err(r"a == 'it\'s'"), ParseError::TrailingInput { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let mut parser = Parser::with_max_depth("(((a)))", 2);
        assert_eq!(
            parser.parse_predicate(),
            Err(ParseError::NestingTooDeep { max_depth: 2 })
        );

        let mut parser = Parser::with_max_depth("(((a)))", 3);
        assert!(parser.parse_predicate().is_ok());
    }

    #[test]
    fn test_deep_nesting_is_rejected_without_overflow() {
        let source = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = Parser::new(&source).parse_predicate().unwrap_err();
        assert_eq!(err, ParseError::NestingTooDeep { max_depth: DEFAULT_MAX_DEPTH });
    }

    #[test]
    fn test_long_chain_parses() {
        let source = vec!["a"; 1_000].join(" and ");
        let expr = parse(&source);
        assert!(matches!(expr, Expression::And(..)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            parse_err("a == 'x' or (").to_string(),
            "Unexpected end of input at offset 13"
        );
        assert_eq!(
            parse_err("a b").to_string(),
            "Unexpected trailing input 'b' at offset 2"
        );
    }
}
