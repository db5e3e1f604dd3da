//! Error types for the slot engine

use thiserror::Error;

/// Rejected spin request
///
/// Both variants are recoverable: the request is refused and the session is
/// left exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    /// Balance below the bet cost and no free spin to consume
    #[error("Insufficient funds: balance {balance} is below bet cost {bet}")]
    InsufficientFunds { balance: u64, bet: u64 },

    /// A spin is still cascading or has unread phase events
    #[error("A spin is already in progress")]
    SpinAlreadyInProgress,
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration parsed but is not playable
    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is neither JSON nor YAML
    #[error("Unknown config format: {0}")]
    UnknownFormat(String),
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
