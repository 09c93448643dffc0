//! DREAMER: the quantum resource-selection engine (§4.2, §4.3).
//!
//! Assembles a Selector's catalogue from pilot descriptions (§4.2), then
//! picks one resource per task under a pluggable strategy (§4.3). See
//! `DESIGN.md` for how this unifies the source's two differently-shaped
//! `Q_DREAMER`s into a single type.

pub mod catalogue;
pub mod error;
pub mod queue_dynamics;
pub mod selector;
pub mod strategy;

pub use catalogue::{assemble_catalogue, Catalogue, ResourceGenerator};
pub use error::{DreamerError, DreamerResult};
pub use queue_dynamics::{QueueDynamicsCache, QueueDynamicsMonitor, DEFAULT_MONITOR_INTERVAL};
pub use selector::Selector;
pub use strategy::{ScoringMode, SelectorKind, SimpleStrategy};
