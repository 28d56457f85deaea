//! Boolean combinator grammar.
//!
//! ```text
//! Expr      := AndChain
//! AndChain  := OrChain ( AND AndChain )?
//! OrChain   := NotExpr ( OR OrChain )?
//! NotExpr   := NOT ParenExpr | ParenExpr
//! ParenExpr := OpenParen Expr CloseParen | RestRun
//! RestRun   := one-or-more consecutive non-keyword tokens
//! ```
//!
//! The AND production is tried before OR, so AND binds outward of OR; both
//! chains are right-associative. A `RestRun` becomes an [`AstNode::Unparsed`]
//! leaf for the composition pass to claim later.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::{fold, ConfigError, ParseError, ParseResult, TokenMatcher};
use crate::ast::{AstNode, BoolOp, UnaryOp};
use crate::config::BooleanTokens;

/// Token roles recognized by this grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Token {
    And,
    Or,
    Not,
    OpenParen,
    CloseParen,
}

/// Parser for the boolean grammar. Construction validates the configured
/// surfaces; a constructed parser is immutable and reentrant.
#[derive(Debug, Clone)]
pub struct Parser {
    surfaces: HashMap<Token, String>,
    matcher: TokenMatcher,
    max_depth: usize,
}

impl Parser {
    pub fn new(
        config: &BooleanTokens,
        case_sensitive: bool,
        max_depth: usize,
    ) -> Result<Self, ConfigError> {
        let case_insensitive = !case_sensitive;
        let surfaces: HashMap<Token, String> = Token::iter()
            .map(|token| (token, fold(surface_of(config, token), case_insensitive)))
            .collect();
        let matcher = TokenMatcher::new(
            surfaces.values().map(String::as_str),
            &surfaces[&Token::OpenParen],
            &surfaces[&Token::CloseParen],
            case_insensitive,
            surfaces.len(),
        )?;
        Ok(Self {
            surfaces,
            matcher,
            max_depth,
        })
    }

    /// Tokenizes and parses `input`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse_text(&self, input: &str) -> Result<AstNode, ParseError> {
        self.parse(&self.matcher.tokenize(input))
    }

    /// Parses a full token sequence; tokens left over after a complete
    /// expression are an error.
    pub fn parse(&self, tokens: &[String]) -> Result<AstNode, ParseError> {
        let (pos, node) = self.parse_and(tokens, 0, 0)?;
        match tokens.get(pos) {
            Some(found) => Err(ParseError::Trailing {
                found: found.clone(),
            }),
            None => Ok(node),
        }
    }

    pub(crate) fn surface(&self, token: Token) -> &str {
        &self.surfaces[&token]
    }

    pub(crate) fn parens(&self) -> (char, char) {
        self.matcher.parens()
    }

    fn eat(&self, tokens: &[String], pos: usize, token: Token) -> Option<usize> {
        self.matcher.eat(tokens, pos, &self.surfaces[&token])
    }

    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth >= self.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn parse_and(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        self.check_depth(depth)?;
        let (pos, lhs) = self.parse_or(tokens, pos, depth)?;
        if let Some(pos) = self.eat(tokens, pos, Token::And) {
            let (pos, rhs) = self.parse_and(tokens, pos, depth + 1)?;
            return Ok((
                pos,
                AstNode::Binary {
                    op: BoolOp::And,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            ));
        }
        Ok((pos, lhs))
    }

    fn parse_or(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        self.check_depth(depth)?;
        let (pos, lhs) = self.parse_not(tokens, pos, depth)?;
        if let Some(pos) = self.eat(tokens, pos, Token::Or) {
            let (pos, rhs) = self.parse_or(tokens, pos, depth + 1)?;
            return Ok((
                pos,
                AstNode::Binary {
                    op: BoolOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            ));
        }
        Ok((pos, lhs))
    }

    fn parse_not(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        if let Some(pos) = self.eat(tokens, pos, Token::Not) {
            let (pos, operand) = self.parse_paren(tokens, pos, depth)?;
            return Ok((
                pos,
                AstNode::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
            ));
        }
        self.parse_paren(tokens, pos, depth)
    }

    /// Parentheses must be correctly matched.
    fn parse_paren(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        if let Some(pos) = self.eat(tokens, pos, Token::OpenParen) {
            let (pos, node) = self.parse_and(tokens, pos, depth + 1)?;
            let pos = self
                .eat(tokens, pos, Token::CloseParen)
                .ok_or_else(|| ParseError::Expected {
                    expected: self.surfaces[&Token::CloseParen].clone(),
                })?;
            return Ok((pos, node));
        }
        self.parse_rest(tokens, pos)
    }

    fn parse_rest(&self, tokens: &[String], pos: usize) -> ParseResult<AstNode> {
        let mut end = pos;
        while end < tokens.len() && !self.matcher.is_keyword(&tokens[end]) {
            end += 1;
        }
        if end == pos {
            return Err(ParseError::UnexpectedEnd);
        }
        Ok((
            end,
            AstNode::Unparsed {
                tokens: tokens[pos..end].to_vec(),
            },
        ))
    }
}

fn surface_of(config: &BooleanTokens, token: Token) -> &str {
    match token {
        Token::And => &config.and,
        Token::Or => &config.or,
        Token::Not => &config.not,
        Token::OpenParen => &config.open,
        Token::CloseParen => &config.close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parser() -> Parser {
        Parser::new(&BooleanTokens::default(), true, 64).unwrap()
    }

    fn leaf(tokens: &[&str]) -> AstNode {
        AstNode::Unparsed {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn and_binds_outward_of_or() {
        let tree = parser().parse_text("a AND b OR c").unwrap();
        assert_eq!(
            tree,
            AstNode::Binary {
                op: BoolOp::And,
                lhs: Box::new(leaf(&["a"])),
                rhs: Box::new(AstNode::Binary {
                    op: BoolOp::Or,
                    lhs: Box::new(leaf(&["b"])),
                    rhs: Box::new(leaf(&["c"])),
                }),
            }
        );
    }

    #[test]
    fn chains_are_right_associative() {
        let tree = parser().parse_text("a AND b AND c").unwrap();
        assert_eq!(
            tree,
            AstNode::Binary {
                op: BoolOp::And,
                lhs: Box::new(leaf(&["a"])),
                rhs: Box::new(AstNode::Binary {
                    op: BoolOp::And,
                    lhs: Box::new(leaf(&["b"])),
                    rhs: Box::new(leaf(&["c"])),
                }),
            }
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let tree = parser().parse_text("(a AND b) OR c").unwrap();
        assert_eq!(
            tree,
            AstNode::Binary {
                op: BoolOp::Or,
                lhs: Box::new(AstNode::Binary {
                    op: BoolOp::And,
                    lhs: Box::new(leaf(&["a"])),
                    rhs: Box::new(leaf(&["b"])),
                }),
                rhs: Box::new(leaf(&["c"])),
            }
        );
    }

    #[test]
    fn not_wraps_the_following_group() {
        let tree = parser().parse_text("NOT (a OR b)").unwrap();
        assert_eq!(
            tree,
            AstNode::Unary {
                op: UnaryOp::Not,
                operand: Box::new(AstNode::Binary {
                    op: BoolOp::Or,
                    lhs: Box::new(leaf(&["a"])),
                    rhs: Box::new(leaf(&["b"])),
                }),
            }
        );
    }

    #[test]
    fn literal_runs_collect_consecutive_non_keywords() {
        let tree = parser().parse_text("age > 30 AND dept == 'x'").unwrap();
        assert_eq!(
            tree,
            AstNode::Binary {
                op: BoolOp::And,
                lhs: Box::new(leaf(&["age", ">", "30"])),
                rhs: Box::new(leaf(&["dept", "==", "'x'"])),
            }
        );
    }

    #[test]
    fn missing_close_paren_is_reported() {
        assert_eq!(
            parser().parse_text("(a AND b").unwrap_err(),
            ParseError::Expected {
                expected: ")".to_string()
            }
        );
    }

    #[test]
    fn empty_operand_run_is_reported() {
        assert_eq!(
            parser().parse_text("a AND").unwrap_err(),
            ParseError::UnexpectedEnd
        );
        assert_eq!(parser().parse_text("").unwrap_err(), ParseError::UnexpectedEnd);
    }

    #[test]
    fn trailing_tokens_are_reported() {
        assert_eq!(
            parser().parse_text("(a) b").unwrap_err(),
            ParseError::Trailing {
                found: "b".to_string()
            }
        );
    }

    #[test]
    fn case_insensitive_mode_accepts_any_keyword_case() {
        let parser = Parser::new(&BooleanTokens::default(), false, 64).unwrap();
        let lower = parser.parse_text("a and b or c").unwrap();
        let upper = parser.parse_text("a AND b OR c").unwrap();
        let mixed = parser.parse_text("a And b oR c").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn colliding_surfaces_fail_construction() {
        let config = BooleanTokens {
            or: "AND".to_string(),
            ..BooleanTokens::default()
        };
        assert_eq!(
            Parser::new(&config, true, 64).unwrap_err(),
            ConfigError::TokenCollision
        );
    }

    #[test]
    fn case_folding_can_introduce_a_collision() {
        let config = BooleanTokens {
            or: "and".to_string(),
            ..BooleanTokens::default()
        };
        // distinct when case-sensitive, collapsed when folded
        assert!(Parser::new(&config, true, 64).is_ok());
        assert_eq!(
            Parser::new(&config, false, 64).unwrap_err(),
            ConfigError::TokenCollision
        );
    }

    #[test]
    fn parentheses_must_be_single_distinct_characters() {
        let long_open = BooleanTokens {
            open: "((".to_string(),
            ..BooleanTokens::default()
        };
        assert_eq!(
            Parser::new(&long_open, true, 64).unwrap_err(),
            ConfigError::ParenLength
        );

        let clashing = BooleanTokens {
            open: "|".to_string(),
            close: "|".to_string(),
            ..BooleanTokens::default()
        };
        assert_eq!(
            Parser::new(&clashing, true, 64).unwrap_err(),
            ConfigError::ParenClash
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let parser = Parser::new(&BooleanTokens::default(), true, 4).unwrap();
        let rule = format!("{}a{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(
            parser.parse_text(&rule).unwrap_err(),
            ParseError::DepthExceeded { limit: 4 }
        );
        assert!(parser.parse_text("(a)").is_ok());
    }
}
