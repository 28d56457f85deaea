//! Recursive-descent parsing shared machinery.
//!
//! Both grammars are parsed by threading an explicit `(tokens, pos, depth)`
//! triple through the descent functions and returning the advanced position
//! alongside each parsed value. Parsers therefore hold only read-only
//! configuration and are reentrant; one instance may serve concurrent
//! callers.

pub mod boolean;
pub mod comparison;

use thiserror::Error;

use crate::tokenizer::Tokenizer;
use crate::trie::KeywordTrie;

/// On success, the advanced position and the parsed value.
pub type ParseResult<O> = Result<(usize, O), ParseError>;

/// Invalid token-surface configuration, detected at parser construction.
/// Construction never partially succeeds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("open and close parentheses must each be a single character")]
    ParenLength,
    #[error("open and close parentheses must be distinct")]
    ParenClash,
    #[error("token collision detected; at least two of the configured tokens are identical")]
    TokenCollision,
}

/// Grammar mismatch, carrying the offending token where one exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expected '{expected}'")]
    Expected { expected: String },
    #[error("expected end of expression, found '{found}'")]
    Trailing { found: String },
    #[error("maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },
    #[error("failed to parse branch '{branch}': {source}")]
    Branch {
        branch: String,
        source: Box<ParseError>,
    },
}

pub(crate) fn fold(surface: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        surface.to_lowercase()
    } else {
        surface.to_string()
    }
}

/// Token recognition shared by both grammars: the keyword trie built from
/// the folded surface strings, the parenthesis characters, and the cursor
/// helpers the descent functions lean on.
#[derive(Debug, Clone)]
pub(crate) struct TokenMatcher {
    case_insensitive: bool,
    matcher: KeywordTrie,
    open: char,
    close: char,
}

impl TokenMatcher {
    /// `surfaces` must already be folded. `roles` is the number of distinct
    /// token roles the grammar defines; a trie terminal count below it means
    /// two roles collapsed onto one surface string.
    pub(crate) fn new<'a, I>(
        surfaces: I,
        open: &str,
        close: &str,
        case_insensitive: bool,
        roles: usize,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let open = single_char(open)?;
        let close = single_char(close)?;
        if open == close {
            return Err(ConfigError::ParenClash);
        }
        let mut matcher = KeywordTrie::new();
        for surface in surfaces {
            matcher.add(surface);
        }
        if matcher.count() != roles {
            return Err(ConfigError::TokenCollision);
        }
        Ok(Self {
            case_insensitive,
            matcher,
            open,
            close,
        })
    }

    pub(crate) fn fold(&self, text: &str) -> String {
        fold(text, self.case_insensitive)
    }

    pub(crate) fn is_keyword(&self, token: &str) -> bool {
        self.matcher.contains(&self.fold(token))
    }

    pub(crate) fn tokenize(&self, input: &str) -> Vec<String> {
        Tokenizer::new(self.open, self.close, &self.matcher).tokenize(input)
    }

    /// Consumes the token at `pos` when its folded text equals `surface`,
    /// returning the advanced position.
    pub(crate) fn eat(&self, tokens: &[String], pos: usize, surface: &str) -> Option<usize> {
        let token = tokens.get(pos)?;
        (self.fold(token) == surface).then_some(pos + 1)
    }

    pub(crate) fn parens(&self) -> (char, char) {
        (self.open, self.close)
    }
}

fn single_char(surface: &str) -> Result<char, ConfigError> {
    let mut chars = surface.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::ParenLength),
    }
}
