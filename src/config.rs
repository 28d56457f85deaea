//! Engine configuration: token surfaces and parse limits.

use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::error::{Error, Result};

/// Surface strings for the boolean grammar's token roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooleanTokens {
    #[serde(default = "default_and")]
    pub and: String,

    #[serde(default = "default_or")]
    pub or: String,

    #[serde(default = "default_not")]
    pub not: String,

    #[serde(default = "default_open")]
    pub open: String,

    #[serde(default = "default_close")]
    pub close: String,
}

impl Default for BooleanTokens {
    fn default() -> Self {
        Self {
            and: default_and(),
            or: default_or(),
            not: default_not(),
            open: default_open(),
            close: default_close(),
        }
    }
}

/// Surface strings for the comparison grammar's token roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTokens {
    #[serde(default = "default_equal")]
    pub equal: String,

    #[serde(default = "default_not_equal")]
    pub not_equal: String,

    #[serde(default = "default_greater_or_equal")]
    pub greater_or_equal: String,

    #[serde(default = "default_greater")]
    pub greater: String,

    #[serde(default = "default_less_or_equal")]
    pub less_or_equal: String,

    #[serde(default = "default_less")]
    pub less: String,

    #[serde(default = "default_open")]
    pub open: String,

    #[serde(default = "default_close")]
    pub close: String,
}

impl Default for ComparisonTokens {
    fn default() -> Self {
        Self {
            equal: default_equal(),
            not_equal: default_not_equal(),
            greater_or_equal: default_greater_or_equal(),
            greater: default_greater(),
            less_or_equal: default_less_or_equal(),
            less: default_less(),
            open: default_open(),
            close: default_close(),
        }
    }
}

/// Full engine configuration. Surface validity (parenthesis length and
/// distinctness, collisions) is checked at parser construction, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub boolean: BooleanTokens,

    #[serde(default)]
    pub comparison: ComparisonTokens,

    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Upper bound on recursive-descent depth; chains and parenthesis
    /// nesting beyond it fail the parse instead of exhausting the stack.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            boolean: BooleanTokens::default(),
            comparison: ComparisonTokens::default(),
            case_sensitive: default_case_sensitive(),
            max_depth: default_max_depth(),
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::internal(format!("failed to read config file: {}", e)))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::internal(format!("failed to parse config file: {}", e)))
    }
}

fn default_and() -> String {
    "AND".to_string()
}

fn default_or() -> String {
    "OR".to_string()
}

fn default_not() -> String {
    "NOT".to_string()
}

fn default_open() -> String {
    "(".to_string()
}

fn default_close() -> String {
    ")".to_string()
}

fn default_equal() -> String {
    "==".to_string()
}

fn default_not_equal() -> String {
    "!=".to_string()
}

fn default_greater_or_equal() -> String {
    ">=".to_string()
}

fn default_greater() -> String {
    ">".to_string()
}

fn default_less_or_equal() -> String {
    "<=".to_string()
}

fn default_less() -> String {
    "<".to_string()
}

fn default_case_sensitive() -> bool {
    true
}

fn default_max_depth() -> usize {
    64
}
