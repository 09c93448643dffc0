//! Output types and scoring (§3 `CutPlan`, §4.6 steps 6-8).

/// One selected cut, as returned to callers (§3).
#[derive(Debug, Clone)]
pub struct SelectedCut {
    pub u: String,
    pub v: String,
    pub gate: String,
    pub theta: Option<f64>,
    pub overhead: f64,
}

/// Configuration knobs the spec documents as tunable policy, not contract
/// (§9): capacity tolerance and the early-termination thresholds.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub active_only: bool,
    pub capacity_tolerance: f64,
    pub early_stop_fragment_multiple: usize,
    pub early_stop_overhead: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            active_only: true,
            capacity_tolerance: 1.2,
            early_stop_fragment_multiple: 2,
            early_stop_overhead: 100.0,
        }
    }
}

/// Output of the planner (§3).
#[derive(Debug, Clone)]
pub struct CutPlan {
    pub number_of_cuts: usize,
    pub selected_cuts: Vec<SelectedCut>,
    pub total_overhead: f64,
    pub fragments: Vec<Vec<String>>,
    pub qpu_assignment: std::collections::BTreeMap<usize, Vec<String>>,
    pub parallelism_score: f64,
    pub quality_score: f64,
    pub notes: String,
}

/// `F/Q` up to `Q` fragments, half-rate growth beyond it (§4.6 step 6,
/// §8 law 9).
pub fn parallelism_score(num_fragments: usize, qpus_count: usize) -> f64 {
    let f = num_fragments as f64;
    let q = qpus_count as f64;
    if num_fragments == 0 {
        0.0
    } else if num_fragments <= qpus_count {
        f / q
    } else {
        1.0 + 0.5 * (f - q) / q
    }
}

/// `parallelism / ln(max(overhead, 1))`, or bare `parallelism` when the
/// overhead penalty is zero (overhead == 1, i.e. no cuts) (§4.6 step 5).
pub fn quality_score(num_fragments: usize, qpus_count: usize, total_overhead: f64) -> f64 {
    if total_overhead <= 0.0 {
        return 0.0;
    }
    let parallelism = parallelism_score(num_fragments, qpus_count);
    let overhead_penalty = total_overhead.max(1.0).ln();
    if overhead_penalty > 0.0 {
        parallelism / overhead_penalty
    } else {
        parallelism
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallelism_score_is_linear_up_to_qpus_count() {
        assert_eq!(parallelism_score(2, 4), 0.5);
        assert_eq!(parallelism_score(4, 4), 1.0);
    }

    #[test]
    fn parallelism_score_grows_at_half_rate_beyond_qpus_count() {
        let at_q = parallelism_score(4, 4);
        let beyond = parallelism_score(6, 4);
        assert!((beyond - at_q - 0.25).abs() < 1e-9);
    }

    #[test]
    fn quality_score_falls_back_to_parallelism_with_no_overhead() {
        assert_eq!(quality_score(4, 4, 1.0), parallelism_score(4, 4));
    }
}
