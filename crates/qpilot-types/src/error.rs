//! Errors raised while constructing or validating data-model values.
//!
//! The dispatch-facing error taxonomy (§7 of the spec) lives in
//! `qpilot-core::DispatchError`; this enum only covers failures that can
//! occur while building the shared types themselves.

#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("quantum task must have at least one circuit")]
    EmptyCircuits,

    #[error("quantum task num_qubits must be positive")]
    InvalidQubitCount,

    #[error("invalid pilot description: {0}")]
    InvalidPilotDescription(String),
}
