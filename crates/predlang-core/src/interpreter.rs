use crate::ast::nodes::{Expression, Term};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Default environment type: variable name to value
pub type Variables = HashMap<String, String>;

/// Source of variable values during evaluation
pub trait Environment {
    /// Value bound to `name`, if any
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Environment for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

/// Resolve a term to its string value. Unbound variables are empty.
pub fn resolve<'a, E: Environment + ?Sized>(term: &'a Term, env: &'a E) -> &'a str {
    match term {
        Term::Literal(value) => value.as_str(),
        Term::Variable(name) => env.lookup(name).unwrap_or(""),
    }
}

/// Evaluate an expression against an environment.
///
/// Total for every tree and environment. `and` / `or` evaluate their left
/// operand first and skip the right one when the result is already known.
pub fn evaluate<E: Environment + ?Sized>(expr: &Expression, env: &E) -> bool {
    // Runs of `not` and the right spine of `and` / `or` chains are walked
    // in this loop; only left operands recurse.
    let mut node = expr;
    let mut negated = false;

    let value = loop {
        match node {
            Expression::Equal(left, right) => break resolve(left, env) == resolve(right, env),
            Expression::NotEqual(left, right) => break resolve(left, env) != resolve(right, env),
            Expression::In(term, set) => break set.contains(resolve(term, env)),
            Expression::NotIn(term, set) => break !set.contains(resolve(term, env)),
            Expression::Truthy(term) => break !resolve(term, env).is_empty(),
            Expression::Not(operand) => {
                negated = !negated;
                node = operand;
            }
            Expression::And(left, right) => {
                if !evaluate(left, env) {
                    break false;
                }
                node = right;
            }
            Expression::Or(left, right) => {
                if evaluate(left, env) {
                    break true;
                }
                node = right;
            }
        }
    };

    value != negated
}
