//! Abstract syntax tree shared by the two grammars.
//!
//! The boolean grammar produces trees whose leaves are all [`AstNode::Unparsed`]
//! runs of raw tokens. The composition pass ([`AstNode::resolve`]) then
//! re-parses each of those leaves through the comparison grammar, leaving a
//! fully composed tree whose remaining `Unparsed` leaves are bare operands
//! (a variable name or a literal).

use serde::{Deserialize, Serialize};

use crate::parser::ParseError;

/// Closed set of node variants. Children are exclusively owned, so the tree
/// is a strict rooted tree; nodes are built bottom-up during parsing,
/// replaced once by the composition pass, and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstNode {
    /// A run of tokens not yet claimed by any grammar. After composition,
    /// only bare comparison operands remain in this form.
    Unparsed { tokens: Vec<String> },
    /// AND / OR over two subtrees.
    Binary {
        op: BoolOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    /// NOT over one subtree.
    Unary { op: UnaryOp, operand: Box<AstNode> },
    /// `==` / `!=` over two operand subtrees.
    Equality {
        op: EqualityOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    /// `>` / `>=` / `<` / `<=` over two operand subtrees.
    Ordinal {
        op: OrdinalOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum BoolOp {
    #[strum(serialize = "AND")]
    And,
    #[strum(serialize = "OR")]
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum UnaryOp {
    #[strum(serialize = "NOT")]
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum EqualityOp {
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum OrdinalOp {
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessOrEqual,
}

/// A grammar that can turn a run of raw tokens into a subtree. Implemented
/// by the comparison parser; the composition pass is generic over it.
pub trait TokenParser {
    fn parse_tokens(&self, tokens: &[String]) -> Result<AstNode, ParseError>;
}

impl<F> TokenParser for F
where
    F: Fn(&[String]) -> Result<AstNode, ParseError>,
{
    fn parse_tokens(&self, tokens: &[String]) -> Result<AstNode, ParseError> {
        self(tokens)
    }
}

impl AstNode {
    /// Variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AstNode::Unparsed { .. } => "Unparsed",
            AstNode::Binary { .. } => "Binary",
            AstNode::Unary { .. } => "Unary",
            AstNode::Equality { .. } => "Equality",
            AstNode::Ordinal { .. } => "Ordinal",
        }
    }

    /// Composition pass: rebuilds this tree with every [`AstNode::Unparsed`]
    /// leaf replaced by the subtree `parser` produces for it. The rebuild is
    /// functional; on the first failing leaf the whole pass fails with the
    /// leaf text attached, and no partial tree is returned. Comparison nodes
    /// are already composed, so their operand leaves are left untouched.
    pub fn resolve(self, parser: &dyn TokenParser) -> Result<AstNode, ParseError> {
        match self {
            AstNode::Unparsed { tokens } => {
                parser
                    .parse_tokens(&tokens)
                    .map_err(|source| ParseError::Branch {
                        branch: tokens.join(" "),
                        source: Box::new(source),
                    })
            }
            AstNode::Binary { op, lhs, rhs } => Ok(AstNode::Binary {
                op,
                lhs: Box::new(lhs.resolve(parser)?),
                rhs: Box::new(rhs.resolve(parser)?),
            }),
            AstNode::Unary { op, operand } => Ok(AstNode::Unary {
                op,
                operand: Box::new(operand.resolve(parser)?),
            }),
            node @ (AstNode::Equality { .. } | AstNode::Ordinal { .. }) => Ok(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(tokens: &[&str]) -> AstNode {
        AstNode::Unparsed {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    // stand-in parser that tags each leaf it sees
    fn tagging_parser(tokens: &[String]) -> Result<AstNode, ParseError> {
        Ok(AstNode::Unparsed {
            tokens: vec![format!("seen:{}", tokens.join(" "))],
        })
    }

    // stand-in parser that rejects multi-token leaves
    fn single_token_parser(tokens: &[String]) -> Result<AstNode, ParseError> {
        if tokens.len() == 1 {
            Ok(AstNode::Unparsed {
                tokens: tokens.to_vec(),
            })
        } else {
            Err(ParseError::UnexpectedEnd)
        }
    }

    fn rejecting_parser(_tokens: &[String]) -> Result<AstNode, ParseError> {
        Err(ParseError::UnexpectedEnd)
    }

    #[test]
    fn resolve_replaces_every_leaf() {
        let tree = AstNode::Binary {
            op: BoolOp::And,
            lhs: Box::new(leaf(&["a"])),
            rhs: Box::new(AstNode::Unary {
                op: UnaryOp::Not,
                operand: Box::new(leaf(&["b"])),
            }),
        };
        let resolved = tree.resolve(&tagging_parser).unwrap();
        assert_eq!(
            resolved,
            AstNode::Binary {
                op: BoolOp::And,
                lhs: Box::new(leaf(&["seen:a"])),
                rhs: Box::new(AstNode::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(leaf(&["seen:b"])),
                }),
            }
        );
    }

    #[test]
    fn resolve_wraps_the_failing_branch() {
        let tree = AstNode::Binary {
            op: BoolOp::Or,
            lhs: Box::new(leaf(&["fine"])),
            rhs: Box::new(leaf(&["age", ">"])),
        };
        let err = tree.resolve(&single_token_parser).unwrap_err();
        match err {
            ParseError::Branch { branch, source } => {
                assert_eq!(branch, "age >");
                assert_eq!(*source, ParseError::UnexpectedEnd);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn resolve_leaves_composed_nodes_alone() {
        let composed = AstNode::Equality {
            op: EqualityOp::Equal,
            lhs: Box::new(leaf(&["department"])),
            rhs: Box::new(leaf(&["'ENGINEERING'"])),
        };
        let resolved = composed.clone().resolve(&rejecting_parser).unwrap();
        assert_eq!(resolved, composed);
    }

    #[test]
    fn operators_render_their_surface_text() {
        assert_eq!(BoolOp::And.to_string(), "AND");
        assert_eq!(UnaryOp::Not.to_string(), "NOT");
        assert_eq!(EqualityOp::NotEqual.to_string(), "!=");
        assert_eq!(OrdinalOp::GreaterOrEqual.to_string(), ">=");
    }
}
