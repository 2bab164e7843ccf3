use crate::ast::nodes::{Expression, Term};
use crate::ast::visitor::Visitor;
use crate::interpreter::{self, Environment};
use crate::parser::{ParseError, ParseResult, Parser};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A compiled predicate, ready to be evaluated any number of times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Predicate {
    expression: Expression,
}

impl Predicate {
    /// Wrap an expression tree
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    /// Parse predicate source text
    pub fn parse(source: &str) -> ParseResult<Self> {
        match Parser::new(source).parse_predicate() {
            Ok(predicate) => {
                tracing::trace!("Parsed predicate {:?} as {}", source, predicate);
                Ok(predicate)
            }
            Err(e) => {
                tracing::debug!("Rejected predicate {:?}: {}", source, e);
                Err(e)
            }
        }
    }

    /// Evaluate against an environment
    pub fn evaluate<E: Environment + ?Sized>(&self, env: &E) -> bool {
        interpreter::evaluate(&self.expression, env)
    }

    /// Root of the expression tree
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Consume the predicate, returning its expression tree
    pub fn into_expression(self) -> Expression {
        self.expression
    }

    /// Names of all variables the predicate reads
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut collector = VariableCollector::default();
        collector.visit_expression(&self.expression);
        collector.names
    }

    /// Serialize the expression tree as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize an expression tree from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromStr for Predicate {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        Self::parse(s)
    }
}

impl From<Expression> for Predicate {
    fn from(expression: Expression) -> Self {
        Self::new(expression)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expression, f)
    }
}

#[derive(Default)]
struct VariableCollector<'ast> {
    names: BTreeSet<&'ast str>,
}

impl<'ast> Visitor<'ast> for VariableCollector<'ast> {
    fn visit_term(&mut self, term: &'ast Term) {
        if let Term::Variable(name) = term {
            self.names.insert(name.as_str());
        }
    }
}
