//! Error types for the damage engine.

/// Errors that can occur while normalizing damage or building formulas.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// No recognizable damage description was found in any supported shape.
    #[error("no damage found")]
    NoDamageFound,

    /// An embedded damage expression used syntax beyond plain addition.
    #[error("unsupported expression syntax in \"{expression}\": {reason}")]
    UnsupportedExpressionSyntax {
        /// The expression that failed to decompose.
        expression: String,
        /// What was encountered.
        reason: String,
    },

    /// The item has no base dice to estimate from.
    #[error("no base dice found on item")]
    NoBaseDice,

    /// A formula string could not be read back.
    #[error("invalid formula: {0}")]
    InvalidFormula(String),

    /// A rich damage structure failed to deserialize.
    #[error("malformed damage data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Convenience result type for damage engine operations.
pub type MechResult<T> = Result<T, MechError>;
