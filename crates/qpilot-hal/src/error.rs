#[derive(Debug, thiserror::Error)]
pub enum HalError {
    #[error("unsupported executor family: {0}")]
    UnsupportedExecutor(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    ExecutionFailed(String),

    #[error("invalid executor config: {0}")]
    InvalidConfig(String),
}

pub type HalResult<T> = Result<T, HalError>;
