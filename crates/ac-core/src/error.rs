/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading host data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An ability abbreviation or name was not recognized.
    #[error("unknown ability: \"{0}\"")]
    UnknownAbility(String),

    /// An outcome string was not one of the four degrees of success.
    #[error("unknown outcome: \"{0}\"")]
    UnknownOutcome(String),

    /// Item JSON could not be read into an item.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// Actor JSON could not be read into an actor.
    #[error("invalid actor: {0}")]
    InvalidActor(String),
}
