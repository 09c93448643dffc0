//! Catalogue-assembly errors (§4.2). Per-task selection failures are not
//! errors — `Selector::select` returns `None` and logs `NoSuitableResource`.

#[derive(Debug, thiserror::Error)]
pub enum DreamerError {
    #[error("no pilot declares a quantum resource type")]
    NoQuantumPilots,

    #[error("combined quantum resource catalogue is empty")]
    NoResources,
}

pub type DreamerResult<T> = Result<T, DreamerError>;
