//! Error types
//!
//! Nothing in the core is fatal. Configuration errors are returned to the host
//! before an engine exists; everything that happens during a round degrades
//! instead of failing.

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid line shape {index}: {reason}")]
    InvalidLineShape { index: usize, reason: String },

    #[error("Free-spin award table must not be empty")]
    EmptyAwardTable,

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Data inconsistency found while interpreting a spin result.
///
/// These are collected on the interpretation, logged, and the affected
/// payline or cell is skipped. The spin still resolves.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpretIssue {
    #[error("payline #{index}: line key {line_key} is not in the shape table ({table_len} shapes)")]
    UnknownLineKey {
        index: usize,
        line_key: usize,
        table_len: usize,
    },

    #[error("payline #{index}: symbol count {symbol_count} exceeds the {available} cells of line {line_key}")]
    SymbolCountOverflow {
        index: usize,
        line_key: usize,
        symbol_count: usize,
        available: usize,
    },

    #[error("payline #{index}: cell ({col}, {row}) is missing from the symbol grid")]
    MissingCell { index: usize, col: u8, row: u8 },
}

/// A dialog collaborator could not show the requested overlay
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("{0} dialog is not available")]
    Unavailable(&'static str),
}
