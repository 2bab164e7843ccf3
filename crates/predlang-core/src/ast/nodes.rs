//! AST node definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A set of literal strings on the right-hand side of `in` / `not in`
pub type Set = BTreeSet<String>;

/// A value-producing leaf of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Fixed string taken from the source
    Literal(String),
    /// Name looked up in the environment at evaluation time
    Variable(String),
}

impl Term {
    /// Create a literal term
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a variable reference
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Literal(value) => write!(f, "'{}'", value),
            Term::Variable(name) => f.write_str(name),
        }
    }
}

/// A node of a parsed predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// `left == right`
    Equal(Term, Term),

    /// `left != right`
    NotEqual(Term, Term),

    /// `term in {...}`
    In(Term, Set),

    /// `term not in {...}`
    NotIn(Term, Set),

    /// A bare term, true when its value is non-empty
    Truthy(Term),

    /// `not expr`
    Not(Box<Expression>),

    /// `left and right`
    And(Box<Expression>, Box<Expression>),

    /// `left or right`
    Or(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Create a set membership test
    pub fn in_set<I, S>(term: Term, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::In(term, values.into_iter().map(Into::into).collect())
    }

    /// Create a negated set membership test
    pub fn not_in_set<I, S>(term: Term, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NotIn(term, values.into_iter().map(Into::into).collect())
    }

    /// Create a NOT expression
    pub fn not(operand: Expression) -> Self {
        Self::Not(Box::new(operand))
    }

    /// Create a logical AND
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Create a logical OR
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Check if this node is a comparison (a leaf of the logical structure)
    pub fn is_comparison(&self) -> bool {
        !matches!(self, Expression::Not(_) | Expression::And(..) | Expression::Or(..))
    }
}

struct DisplaySet<'a>(&'a Set);

impl fmt::Display for DisplaySet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'", value)?;
        }
        f.write_str("}")
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression, grouped: bool) -> fmt::Result {
    if grouped {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

// Parentheses are emitted only where the parser would otherwise build a
// different tree, so printing and re-parsing is lossless.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Equal(left, right) => write!(f, "{} == {}", left, right),
            Expression::NotEqual(left, right) => write!(f, "{} != {}", left, right),
            Expression::In(term, set) => write!(f, "{} in {}", term, DisplaySet(set)),
            Expression::NotIn(term, set) => write!(f, "{} not in {}", term, DisplaySet(set)),
            Expression::Truthy(term) => write!(f, "{}", term),
            Expression::Not(operand) => {
                // A bare `not not` would cancel out when parsed again
                f.write_str("not ")?;
                write_operand(f, operand, !operand.is_comparison())
            }
            Expression::And(left, right) => {
                write_operand(f, left, matches!(**left, Expression::And(..) | Expression::Or(..)))?;
                f.write_str(" and ")?;
                write_operand(f, right, matches!(**right, Expression::Or(..)))
            }
            Expression::Or(left, right) => {
                write_operand(f, left, matches!(**left, Expression::Or(..)))?;
                f.write_str(" or ")?;
                write_operand(f, right, false)
            }
        }
    }
}
