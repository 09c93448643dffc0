//! Selector strategy variants (§4.3).
//!
//! §9 replaces subclassing (`RoundRobinStrategy`, `LeastErrorRateStrategy`,
//! `LeastBusyStrategy`, the scoring-mode `Q_DREAMER`) with "strategy as
//! variant": one `SelectorKind` enum, matched exhaustively in
//! `Selector::select`.

/// A scoring-strategy objective: trades fidelity against queue
/// utilization (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringMode {
    HighFidelity,
    Balanced,
    HighSpeed,
}

impl ScoringMode {
    /// `(fidelity_weight, queue_weight)`.
    pub fn weights(self) -> (f64, f64) {
        match self {
            ScoringMode::HighFidelity => (0.8, 0.2),
            ScoringMode::Balanced => (0.5, 0.5),
            ScoringMode::HighSpeed => (0.2, 0.8),
        }
    }
}

/// A queue-signal-free strategy (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleStrategy {
    LeastErrorRate,
    RoundRobin,
    LeastBusy,
}

/// Which family of strategy a `Selector` was constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Scoring(ScoringMode),
    Simple(SimpleStrategy),
}
