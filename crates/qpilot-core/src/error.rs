//! The dispatch-facing error taxonomy (§7).

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Cluster client not ready, or failed to accept a task at submit time.
    #[error("submit failed: {0}")]
    SubmitError(String),

    /// `submit_quantum` called before `initialize_dreamer`.
    #[error("DREAMER has not been initialized")]
    NotInitialized,

    #[error(transparent)]
    Dreamer(#[from] qpilot_dreamer::DreamerError),

    #[error(transparent)]
    Types(#[from] qpilot_types::error::TypesError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
