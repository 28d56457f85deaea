//! Fallback-chaining interpreter abstraction and the boolean fold.
//!
//! An interpreter maps an AST node to a typed result or a failure. One that
//! only understands some node kinds reports the distinguished
//! [`EvalError::UnrecognizedNode`] for the rest, which lets [`Interpreter::or_else`]
//! hand those nodes to another interpreter while every other outcome stands.

use thiserror::Error;

use crate::ast::{AstNode, BoolOp, UnaryOp};

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("cannot evaluate multi-word variable '{0}'")]
    MultiWordVariable(String),
    /// Distinguished failure kind that routes a node to the next interpreter
    /// in a fallback chain. Escaping a fully configured evaluator means the
    /// chain was miswired, not that the input data was bad.
    #[error("unrecognized node kind '{0}'")]
    UnrecognizedNode(&'static str),
}

pub trait Interpreter<T> {
    fn interpret(&self, node: &AstNode) -> EvalResult<T>;

    /// Chains `self` with `fallback`: nodes `self` does not recognize are
    /// handed to `fallback`; any other outcome of `self`, success or
    /// failure, is returned unchanged.
    fn or_else<B>(self, fallback: B) -> Fallback<Self, B>
    where
        Self: Sized,
        B: Interpreter<T>,
    {
        Fallback {
            first: self,
            second: fallback,
        }
    }
}

impl<T, F> Interpreter<T> for F
where
    F: Fn(&AstNode) -> EvalResult<T>,
{
    fn interpret(&self, node: &AstNode) -> EvalResult<T> {
        self(node)
    }
}

/// Composition of two interpreters built by [`Interpreter::or_else`].
pub struct Fallback<A, B> {
    first: A,
    second: B,
}

impl<T, A, B> Interpreter<T> for Fallback<A, B>
where
    A: Interpreter<T>,
    B: Interpreter<T>,
{
    fn interpret(&self, node: &AstNode) -> EvalResult<T> {
        match self.first.interpret(node) {
            Err(EvalError::UnrecognizedNode(_)) => self.second.interpret(node),
            outcome => outcome,
        }
    }
}

/// Folds the boolean combinator layer of `node`, delegating every other node
/// kind to `leaves`. Both sides of a binary node are always evaluated, right
/// child first; a right-side failure surfaces even when the left side alone
/// would determine the result.
pub fn eval_boolean<I>(node: &AstNode, leaves: &I) -> EvalResult<bool>
where
    I: Interpreter<bool> + ?Sized,
{
    match node {
        AstNode::Binary { op, lhs, rhs } => {
            let rhs = eval_boolean(rhs, leaves)?;
            let lhs = eval_boolean(lhs, leaves)?;
            Ok(match op {
                BoolOp::And => lhs && rhs,
                BoolOp::Or => lhs || rhs,
            })
        }
        AstNode::Unary {
            op: UnaryOp::Not,
            operand,
        } => Ok(!eval_boolean(operand, leaves)?),
        other => leaves.interpret(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(token: &str) -> AstNode {
        AstNode::Unparsed {
            tokens: vec![token.to_string()],
        }
    }

    fn always_true(_node: &AstNode) -> EvalResult<bool> {
        Ok(true)
    }

    fn unrecognizing(node: &AstNode) -> EvalResult<bool> {
        Err(EvalError::UnrecognizedNode(node.kind()))
    }

    fn failing(_node: &AstNode) -> EvalResult<bool> {
        Err(EvalError::UnknownVariable("a".to_string()))
    }

    #[test]
    fn fallback_routes_unrecognized_nodes_to_the_second_interpreter() {
        let chained = unrecognizing.or_else(always_true);
        assert_eq!(chained.interpret(&leaf("a")), Ok(true));
    }

    #[test]
    fn fallback_leaves_other_failures_alone() {
        let chained = failing.or_else(always_true);
        assert_eq!(
            chained.interpret(&leaf("a")),
            Err(EvalError::UnknownVariable("a".to_string()))
        );
    }

    #[test]
    fn fallback_keeps_the_first_success() {
        fn always_false(_node: &AstNode) -> EvalResult<bool> {
            Ok(false)
        }
        let chained = always_false.or_else(always_true);
        assert_eq!(chained.interpret(&leaf("a")), Ok(false));
    }

    #[test]
    fn boolean_fold_combines_both_sides() {
        fn by_name(node: &AstNode) -> EvalResult<bool> {
            match node {
                AstNode::Unparsed { tokens } => Ok(tokens[0] == "yes"),
                other => Err(EvalError::UnrecognizedNode(other.kind())),
            }
        }
        let and = AstNode::Binary {
            op: BoolOp::And,
            lhs: Box::new(leaf("yes")),
            rhs: Box::new(leaf("no")),
        };
        assert_eq!(eval_boolean(&and, &by_name), Ok(false));

        let or = AstNode::Binary {
            op: BoolOp::Or,
            lhs: Box::new(leaf("yes")),
            rhs: Box::new(leaf("no")),
        };
        assert_eq!(eval_boolean(&or, &by_name), Ok(true));

        let not = AstNode::Unary {
            op: UnaryOp::Not,
            operand: Box::new(leaf("no")),
        };
        assert_eq!(eval_boolean(&not, &by_name), Ok(true));
    }

    #[test]
    fn right_side_failures_surface_even_when_the_left_side_decides() {
        fn left_only(node: &AstNode) -> EvalResult<bool> {
            match node {
                AstNode::Unparsed { tokens } if tokens[0] == "known" => Ok(false),
                _ => Err(EvalError::UnknownVariable("right".to_string())),
            }
        }
        // left side alone would make the AND false, yet the failing right
        // side is still evaluated and its failure wins
        let and = AstNode::Binary {
            op: BoolOp::And,
            lhs: Box::new(leaf("known")),
            rhs: Box::new(leaf("right")),
        };
        assert_eq!(
            eval_boolean(&and, &left_only),
            Err(EvalError::UnknownVariable("right".to_string()))
        );
    }
}
