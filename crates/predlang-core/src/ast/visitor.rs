//! Visitor pattern for traversing AST

use super::nodes::{Expression, Set, Term};

/// Visitor trait for AST traversal
pub trait Visitor<'ast>: Sized {
    /// Visit an expression
    fn visit_expression(&mut self, expr: &'ast Expression) {
        walk_expression(self, expr);
    }

    /// Visit a term
    fn visit_term(&mut self, _term: &'ast Term) {
        // Leaf node, no children
    }

    /// Visit the set of an `in` / `not in` comparison
    fn visit_set(&mut self, _set: &'ast Set) {
        // Leaf node, no children
    }
}

/// Walk an expression, visiting children left to right
pub fn walk_expression<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Equal(left, right) | Expression::NotEqual(left, right) => {
            visitor.visit_term(left);
            visitor.visit_term(right);
        }

        Expression::In(term, set) | Expression::NotIn(term, set) => {
            visitor.visit_term(term);
            visitor.visit_set(set);
        }

        Expression::Truthy(term) => {
            visitor.visit_term(term);
        }

        Expression::Not(operand) => {
            visitor.visit_expression(operand);
        }

        Expression::And(left, right) | Expression::Or(left, right) => {
            visitor.visit_expression(left);
            visitor.visit_expression(right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NodeCounter {
        expressions: usize,
        terms: usize,
        sets: usize,
    }

    impl<'ast> Visitor<'ast> for NodeCounter {
        fn visit_expression(&mut self, expr: &'ast Expression) {
            self.expressions += 1;
            walk_expression(self, expr);
        }

        fn visit_term(&mut self, _term: &'ast Term) {
            self.terms += 1;
        }

        fn visit_set(&mut self, _set: &'ast Set) {
            self.sets += 1;
        }
    }

    struct TermCollector<'ast> {
        terms: Vec<&'ast Term>,
    }

    impl<'ast> Visitor<'ast> for TermCollector<'ast> {
        fn visit_term(&mut self, term: &'ast Term) {
            self.terms.push(term);
        }
    }

    fn sample() -> Expression {
        // not (kind in {a, b}) and (x == 'y' or flag)
        Expression::and(
            Expression::not(Expression::in_set(Term::variable("kind"), ["a", "b"])),
            Expression::or(
                Expression::Equal(Term::variable("x"), Term::literal("y")),
                Expression::Truthy(Term::variable("flag")),
            ),
        )
    }

    #[test]
    fn test_counts_every_node() {
        let mut counter = NodeCounter { expressions: 0, terms: 0, sets: 0 };
        counter.visit_expression(&sample());

        assert_eq!(counter.expressions, 6);
        assert_eq!(counter.terms, 4);
        assert_eq!(counter.sets, 1);
    }

    #[test]
    fn test_visits_terms_left_to_right() {
        let expr = sample();
        let mut collector = TermCollector { terms: Vec::new() };
        collector.visit_expression(&expr);

        let rendered: Vec<String> = collector.terms.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["kind", "x", "'y'", "flag"]);
    }
}
