//! Boolean rule expressions parsed and evaluated against named values.
//!
//! A rule such as `age > 30 AND department == 'ENGINEERING'` is tokenized
//! through a keyword trie, parsed by the boolean grammar, composed by
//! re-parsing each leaf through the comparison grammar, and evaluated
//! against a flat map of string bindings.
//!
//! ```
//! use ruleval::{EngineConfig, RuleEngine};
//! use std::collections::HashMap;
//!
//! let engine = RuleEngine::new(&EngineConfig::default())?;
//! let bindings = HashMap::from([
//!     ("age".to_string(), "31".to_string()),
//!     ("department".to_string(), "ENGINEERING".to_string()),
//! ]);
//! assert!(engine.evaluate("age > 30 AND department == 'ENGINEERING'", &bindings)?);
//! # Ok::<(), ruleval::Error>(())
//! ```

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod parser;
pub mod tokenizer;
pub mod trie;

// Re-exports
pub use ast::{AstNode, BoolOp, EqualityOp, OrdinalOp, TokenParser, UnaryOp};
pub use config::{BooleanTokens, ComparisonTokens, EngineConfig};
pub use engine::RuleEngine;
pub use error::{Error, Result};
pub use eval::{evaluate, var_interpreter, EvalError, Evaluation, Interpreter, RuleEvaluator};
pub use parser::{ConfigError, ParseError};
pub use tokenizer::Tokenizer;
pub use trie::KeywordTrie;
