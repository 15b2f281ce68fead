use thiserror::Error;

/// Top-level error type for the ClaimSnap pipeline.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("recognition error: {0}")]
    Recognition(String),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("registration error: {0}")]
    Registration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
