use thiserror::Error;

/// Alias for `Result<T, StudioError>`.
pub type StudioResult<T> = Result<T, StudioError>;

/// Failure reported by a text or image generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The generator could not complete the request.
    #[error("generation request failed: {0}")]
    Request(String),

    /// The generator answered with nothing usable.
    #[error("generator returned an empty response")]
    EmptyResponse,

    /// The request was cancelled before it completed.
    #[error("generation cancelled")]
    Cancelled,
}

/// Errors from running studio jobs.
#[derive(Debug, Error)]
pub enum StudioError {
    /// A generator call failed.
    #[error("{stage} generation failed: {source}")]
    Generate {
        /// The pipeline stage that made the call.
        stage: &'static str,
        /// The generator's error.
        #[source]
        source: GenerateError,
    },

    /// The generated chapter had no text once headers were removed.
    #[error("generated chapter {chapter} has no body text")]
    EmptyChapter {
        /// The chapter that was requested.
        chapter: u32,
    },

    /// A blocking job panicked or was aborted.
    #[error("job did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A configuration document could not be read.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl StudioError {
    pub(crate) fn generate(stage: &'static str) -> impl FnOnce(GenerateError) -> Self {
        move |source| StudioError::Generate { stage, source }
    }
}
