//! Test utilities and helper functions for predicate tests
//!
//! This module provides common fixtures to keep tests short and readable.

use crate::interpreter::{Environment, Variables};
use std::cell::Cell;

/// Build a variable environment from name/value pairs
///
/// # Examples
/// ```
/// use predlang_core::testing::variables;
///
/// let env = variables(&[("kind", "street"), ("country", "TR")]);
/// assert_eq!(env["kind"], "street");
/// ```
pub fn variables(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Environment wrapper that counts variable lookups.
///
/// Used to observe which operands an evaluation actually touched.
///
/// # Examples
/// ```
/// use predlang_core::testing::{variables, CountingEnvironment};
/// use predlang_core::parse_predicate;
///
/// let env = CountingEnvironment::new(variables(&[("a", "x")]));
/// let predicate = parse_predicate("'' and a").unwrap();
/// assert!(!predicate.evaluate(&env));
/// assert_eq!(env.lookups(), 0);
/// ```
#[derive(Debug, Default)]
pub struct CountingEnvironment<E> {
    inner: E,
    lookups: Cell<usize>,
}

impl<E: Environment> CountingEnvironment<E> {
    /// Wrap an environment
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            lookups: Cell::new(0),
        }
    }

    /// Number of lookups performed so far
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    /// Reset the lookup counter
    pub fn reset(&self) {
        self.lookups.set(0);
    }
}

impl<E: Environment> Environment for CountingEnvironment<E> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.lookup(name)
    }
}
