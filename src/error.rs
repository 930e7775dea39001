//! Error types

use thiserror::Error;

/// Failure to load or validate [`Settings`](crate::Settings)
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure inside the state engine or its tick loop
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
    #[error("game state lock poisoned by a panicked thread")]
    StatePoisoned,
    #[error("score overflowed adding {delta} to {score}")]
    ScoreOverflow { score: i64, delta: i64 },
    #[error("tick loop already started")]
    AlreadyStarted,
    #[error("failed to spawn tick thread: {0}")]
    Spawn(#[source] std::io::Error),
}
