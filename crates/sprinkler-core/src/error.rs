/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while resolving configuration or decoding persisted records.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No tile configuration is registered under this code.
    #[error("unknown tile: \"{0}\"")]
    UnknownTile(String),

    /// The tile exists but lacks a component the caller depends on.
    #[error("tile \"{tile}\" has no {kind} component")]
    MissingComponent {
        /// The tile configuration code.
        tile: String,
        /// The component kind that was looked up.
        kind: &'static str,
    },

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted record or configuration document failed to decode.
    #[error("malformed record: {0}")]
    Record(#[from] serde_json::Error),
}
