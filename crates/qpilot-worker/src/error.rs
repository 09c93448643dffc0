#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("No suitable quantum resource")]
    NoSuitableResource,

    #[error(transparent)]
    Execution(#[from] qpilot_hal::HalError),

    #[error(transparent)]
    Metrics(#[from] qpilot_metrics::MetricsError),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
