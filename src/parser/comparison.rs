//! Comparison grammar.
//!
//! ```text
//! Expr         := EqualLevel
//! EqualLevel   := OrdinalLevel ( (Equal|NotEqual) OrdinalLevel )?
//! OrdinalLevel := Term ( (GreaterOrEqual|LessOrEqual|Greater|Less) Term )?
//! Term         := OpenParen Expr CloseParen | RestRun
//! ```
//!
//! Equality binds looser than the ordinal comparisons, and each level applies
//! at most one operator, so chained comparisons (`a < b < c`) do not parse.
//! This grammar also serves as the re-parse step of the composition pass:
//! boolean-level leaves are re-tokenized with this grammar's own parentheses
//! and keywords, then parsed here.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::{fold, ConfigError, ParseError, ParseResult, TokenMatcher};
use crate::ast::{AstNode, EqualityOp, OrdinalOp, TokenParser};
use crate::config::ComparisonTokens;

/// Token roles recognized by this grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Token {
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
    OpenParen,
    CloseParen,
}

/// Parser for the comparison grammar. Construction validates the configured
/// surfaces; a constructed parser is immutable and reentrant.
#[derive(Debug, Clone)]
pub struct Parser {
    surfaces: HashMap<Token, String>,
    matcher: TokenMatcher,
    max_depth: usize,
}

impl Parser {
    pub fn new(
        config: &ComparisonTokens,
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
        let (pos, node) = self.parse_equal(tokens, 0, 0)?;
        match tokens.get(pos) {
            Some(found) => Err(ParseError::Trailing {
                found: found.clone(),
            }),
            None => Ok(node),
        }
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

    fn parse_equal(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        self.check_depth(depth)?;
        let (pos, lhs) = self.parse_ordinal(tokens, pos, depth)?;
        for (token, op) in [
            (Token::Equal, EqualityOp::Equal),
            (Token::NotEqual, EqualityOp::NotEqual),
        ] {
            if let Some(pos) = self.eat(tokens, pos, token) {
                let (pos, rhs) = self.parse_ordinal(tokens, pos, depth)?;
                return Ok((
                    pos,
                    AstNode::Equality {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                ));
            }
        }
        Ok((pos, lhs))
    }

    fn parse_ordinal(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        let (pos, lhs) = self.parse_term(tokens, pos, depth)?;
        for (token, op) in [
            (Token::GreaterOrEqual, OrdinalOp::GreaterOrEqual),
            (Token::LessOrEqual, OrdinalOp::LessOrEqual),
            (Token::Greater, OrdinalOp::Greater),
            (Token::Less, OrdinalOp::Less),
        ] {
            if let Some(pos) = self.eat(tokens, pos, token) {
                let (pos, rhs) = self.parse_term(tokens, pos, depth)?;
                return Ok((
                    pos,
                    AstNode::Ordinal {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                ));
            }
        }
        Ok((pos, lhs))
    }

    /// Parentheses must be correctly matched.
    fn parse_term(&self, tokens: &[String], pos: usize, depth: usize) -> ParseResult<AstNode> {
        if let Some(pos) = self.eat(tokens, pos, Token::OpenParen) {
            let (pos, node) = self.parse_equal(tokens, pos, depth + 1)?;
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

impl TokenParser for Parser {
    /// Re-parses a boolean-level leaf: the joined token text is re-tokenized
    /// with this grammar's own parentheses and keywords before parsing, so
    /// comparison operators are recognized even where the boolean tokenizer
    /// left them embedded in a literal run.
    fn parse_tokens(&self, tokens: &[String]) -> Result<AstNode, ParseError> {
        self.parse_text(&tokens.join(" "))
    }
}

fn surface_of(config: &ComparisonTokens, token: Token) -> &str {
    match token {
        Token::Equal => &config.equal,
        Token::NotEqual => &config.not_equal,
        Token::GreaterOrEqual => &config.greater_or_equal,
        Token::Greater => &config.greater,
        Token::LessOrEqual => &config.less_or_equal,
        Token::Less => &config.less,
        Token::OpenParen => &config.open,
        Token::CloseParen => &config.close,
    }
}
