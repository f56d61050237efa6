//! Error types.

use thiserror::Error;

/// Errors raised by the session and its pipelines.
#[derive(Debug, Error)]
pub enum CollageError {
    /// A subscription was registered after the screen was torn down.
    #[error("subscription scope already released")]
    ScopeReleased,

    /// The session needs a tokio runtime for timers and async collaborators.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// Save was requested without a composed, non-blank preview.
    #[error("nothing to save")]
    NothingToSave,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a [`crate::config::CollageConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure reported by the photo store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PersistError {
    pub reason: String,
}

impl PersistError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CollageError>;
