//! Error types for alternative critical sessions.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can end an alternative critical invocation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The feature is switched off in the settings.
    #[error("alternative critical damage is disabled")]
    Disabled,

    /// The chat entry has no item to roll damage for.
    #[error("chat entry has no item")]
    MissingItem,

    /// Every fallback tier failed to produce damage.
    #[error("no damage found for {0}")]
    NoDamageFound(String),

    /// The host failed to evaluate a formula.
    #[error("roll evaluation failed: {0}")]
    Evaluation(String),

    /// The host failed to post the result.
    #[error("chat post failed: {0}")]
    Post(String),
}
