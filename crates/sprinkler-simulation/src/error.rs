use sprinkler_core::{CoreError, EntityId};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the simulation runtime.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No active sprinkler has this id.
    #[error("entity not found in simulation: {0}")]
    EntityNotFound(EntityId),

    /// The entity is active, so there is no stored state to reload.
    #[error("entity {0} is not unloaded")]
    NotDormant(EntityId),

    /// Configuration lookup or record decoding failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A registered system reported a failure.
    #[error("system error: {0}")]
    SystemError(String),
}
