#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("qpus_count must be >= 1")]
    InvalidQpuCount,
}

pub type PlannerResult<T> = Result<T, PlannerError>;
