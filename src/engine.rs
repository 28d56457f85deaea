//! Facade wiring the two grammars and the evaluator together.

use std::collections::HashMap;

use tracing::instrument;

use crate::ast::{AstNode, BoolOp};
use crate::config::EngineConfig;
use crate::eval;
use crate::parser::{boolean, comparison, ConfigError, ParseError};

/// Parses rule text through the two-level grammar and evaluates composed
/// trees against bindings. Construction validates the configured token
/// surfaces once; a constructed engine is immutable and shareable across
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    boolean: boolean::Parser,
    comparison: comparison::Parser,
}

impl RuleEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            boolean: boolean::Parser::new(
                &config.boolean,
                config.case_sensitive,
                config.max_depth,
            )?,
            comparison: comparison::Parser::new(
                &config.comparison,
                config.case_sensitive,
                config.max_depth,
            )?,
        })
    }

    /// Parses `rule` into a fully composed tree: the boolean grammar first,
    /// then every leaf re-parsed through the comparison grammar.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self, rule: &str) -> Result<AstNode, ParseError> {
        let tree = self.boolean.parse_text(rule)?;
        tree.resolve(&self.comparison)
    }

    /// Parses and evaluates in one step. Rule text is re-parsed on every
    /// call; callers evaluating one rule against many bindings can parse
    /// once and use [`RuleEngine::evaluate_ast`].
    pub fn evaluate(
        &self,
        rule: &str,
        bindings: &HashMap<String, String>,
    ) -> Result<bool, ParseError> {
        Ok(eval::evaluate(&self.parse(rule)?, bindings))
    }

    /// Evaluates an already-composed tree. Never fails.
    pub fn evaluate_ast(&self, tree: &AstNode, bindings: &HashMap<String, String>) -> bool {
        eval::evaluate(tree, bindings)
    }

    /// Combines two rules into one by parenthesizing each side and joining
    /// them with `op`, using this engine's configured surfaces. The combined
    /// text is re-validated by a full parse before it is returned.
    pub fn combine(&self, first: &str, second: &str, op: BoolOp) -> Result<String, ParseError> {
        let (open, close) = self.boolean.parens();
        let surface = self.boolean.surface(match op {
            BoolOp::And => boolean::Token::And,
            BoolOp::Or => boolean::Token::Or,
        });
        let combined = format!("{open}{first}{close} {surface} {open}{second}{close}");
        self.parse(&combined)?;
        Ok(combined)
    }
}
