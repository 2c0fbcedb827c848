use std::path::PathBuf;

use thiserror::Error;

/// Startup-fatal configuration problems. The monitor never starts when one occurs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stock_pairs is empty")]
    NoPairs,

    #[error("stock_pairs[{index}] is invalid: {reason}")]
    InvalidPair { index: usize, reason: String },

    #[error("pushplus_token is empty")]
    MissingToken,

    #[error("threshold must be a finite non-negative ratio, got {0}")]
    InvalidThreshold(f64),

    #[error("interval must be at least 1 second, got {0}")]
    InvalidInterval(u64),
}

/// An error that escaped per-pair containment during a cycle.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("cycle panicked: {0}")]
    Panicked(String),
}
