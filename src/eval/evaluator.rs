//! Domain evaluation of composed rule trees against string bindings.

use std::collections::HashMap;

use serde::Serialize;

use super::interpreter::{eval_boolean, EvalError, EvalResult, Interpreter};
use crate::ast::{AstNode, BoolOp, EqualityOp, OrdinalOp, UnaryOp};

/// Outcome of walking one node: the symbolic key it denotes (the operand
/// text for leaves, empty elsewhere) and whether the node matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub key: String,
    pub matched: bool,
}

/// Resolves comparison and leaf nodes against a set of named string values.
///
/// Degenerate data conditions degrade to an unmatched result instead of
/// failing: a missing binding and a non-numeric ordinal operand both yield
/// `matched = false`, so rules over partially populated bindings evaluate to
/// "no match" rather than erroring.
pub struct RuleEvaluator<'a> {
    bindings: &'a HashMap<String, String>,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(bindings: &'a HashMap<String, String>) -> Self {
        Self { bindings }
    }

    /// Walks `node` bottom-up. Comparison nodes resolve their left key as a
    /// binding name and their right key as the value to compare against;
    /// boolean nodes reaching this level fold their children's `matched`
    /// flags; a lone leaf carries its text as key and matches trivially.
    pub fn eval_node(&self, node: &AstNode) -> Evaluation {
        match node {
            AstNode::Unparsed { tokens } => Evaluation {
                key: strip_quotes(&tokens.join(" ")),
                matched: true,
            },
            AstNode::Binary { op, lhs, rhs } => {
                let lhs = self.eval_node(lhs);
                let rhs = self.eval_node(rhs);
                let matched = match op {
                    BoolOp::And => lhs.matched && rhs.matched,
                    BoolOp::Or => lhs.matched || rhs.matched,
                };
                Evaluation {
                    key: String::new(),
                    matched,
                }
            }
            AstNode::Unary {
                op: UnaryOp::Not,
                operand,
            } => Evaluation {
                key: String::new(),
                matched: !self.eval_node(operand).matched,
            },
            AstNode::Equality { op, lhs, rhs } => {
                let variable = self.eval_node(lhs).key;
                let expected = self.eval_node(rhs).key;
                let matched = match self.bindings.get(&variable) {
                    None => false,
                    Some(value) => match op {
                        EqualityOp::Equal => strip_quotes(value) == expected,
                        EqualityOp::NotEqual => strip_quotes(value) != expected,
                    },
                };
                Evaluation {
                    key: String::new(),
                    matched,
                }
            }
            AstNode::Ordinal { op, lhs, rhs } => {
                let variable = self.eval_node(lhs).key;
                let expected = self.eval_node(rhs).key;
                let matched = match self.bindings.get(&variable) {
                    None => false,
                    Some(value) => compare_numeric(value, &expected, *op),
                };
                Evaluation {
                    key: String::new(),
                    matched,
                }
            }
        }
    }
}

impl Interpreter<bool> for RuleEvaluator<'_> {
    fn interpret(&self, node: &AstNode) -> EvalResult<bool> {
        Ok(self.eval_node(node).matched)
    }
}

/// Resolves single-token leaves as boolean variables in `variables`. Every
/// other node kind is reported as unrecognized so a fallback chain can pick
/// it up; an unbound or multi-word variable is a real failure.
pub fn var_interpreter(variables: &HashMap<String, bool>) -> impl Interpreter<bool> + '_ {
    move |node: &AstNode| match node {
        AstNode::Unparsed { tokens } => {
            if tokens.len() != 1 {
                return Err(EvalError::MultiWordVariable(tokens.join(" ")));
            }
            variables
                .get(&tokens[0])
                .copied()
                .ok_or_else(|| EvalError::UnknownVariable(tokens[0].clone()))
        }
        other => Err(EvalError::UnrecognizedNode(other.kind())),
    }
}

/// Evaluates a composed rule tree against `bindings`. Total by design:
/// degenerate data degrades to `false` rather than failing.
pub fn evaluate(node: &AstNode, bindings: &HashMap<String, String>) -> bool {
    eval_boolean(node, &RuleEvaluator::new(bindings)).unwrap_or_else(|err| {
        // the rule evaluator recognizes every node kind; reaching this arm
        // means the interpreter chain was miswired
        tracing::warn!(error = %err, "evaluation failed; treating rule as unmatched");
        false
    })
}

fn strip_quotes(text: &str) -> String {
    text.replace('\'', "")
}

/// Both operands must parse as numbers; anything else is simply no match.
fn compare_numeric(value: &str, expected: &str, op: OrdinalOp) -> bool {
    let (Ok(value), Ok(expected)) = (value.parse::<f64>(), expected.parse::<f64>()) else {
        return false;
    };
    match op {
        OrdinalOp::Greater => value > expected,
        OrdinalOp::GreaterOrEqual => value >= expected,
        OrdinalOp::Less => value < expected,
        OrdinalOp::LessOrEqual => value <= expected,
    }
}
