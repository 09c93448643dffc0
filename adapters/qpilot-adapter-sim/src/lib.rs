//! Simulator-family executor adapter.
//!
//! Grounded on `arvak_adapter_sim`'s module shape, but with no dependency
//! on `rand` — the teacher pins `rand` directly for its statevector
//! sampling (with a comment noting it isn't a workspace dependency); this
//! adapter instead derives a deterministic pseudo-distribution from
//! `rustc_hash`, matching the simulator-jitter technique `spec.md` §9
//! explicitly sanctions ("any deterministic bounded jitter is acceptable").
//!
//! ```
//! use qpilot_adapter_sim::SimulatorExecutor;
//! use qpilot_hal::Executor;
//!
//! let exec = SimulatorExecutor::new("aer_simulator");
//! assert!(exec.is_simulator());
//! ```

mod simulator;

pub use simulator::SimulatorExecutor;
