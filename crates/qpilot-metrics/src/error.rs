#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("metrics file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics row encoding error: {0}")]
    Csv(#[from] csv::Error),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
