use thiserror::Error;

/// Build session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The build was accessed while no session scope was active.
    #[error("build state accessed outside an active session scope")]
    OutsideScope,

    #[error("failed to serialize build: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
