/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or converting structured story data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The JSON document does not match the chapter schema.
    #[error("invalid chapter document: {0}")]
    Json(#[from] serde_json::Error),

    /// A threshold string such as `>=60` could not be parsed.
    #[error("invalid threshold: \"{0}\"")]
    InvalidThreshold(String),

    /// An attribute range was built with `min > max`.
    #[error("invalid range for \"{name}\": [{min}, {max}]")]
    InvalidRange {
        /// The attribute name.
        name: String,
        /// The lower bound.
        min: i64,
        /// The upper bound.
        max: i64,
    },
}
