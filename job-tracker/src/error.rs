use shared_types::ValidationErrors;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Failures surfaced by the tracker core. None of them are fatal; callers
/// report them and keep the current view.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TrackerError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            TrackerError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
