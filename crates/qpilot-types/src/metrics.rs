//! `TaskMetrics`: the canonical metrics row shape (§3, §6).
//!
//! Field order in this struct is the alphabetical order the CSV header
//! must be written in — `qpilot-metrics` relies on derive order matching
//! declaration order, so don't reorder these without re-checking §6.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Running,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMetrics {
    #[serde(rename = "completion-time")]
    pub completion_time: Option<String>,
    #[serde(rename = "error-msg")]
    pub error_msg: Option<String>,
    #[serde(rename = "execution-secs")]
    pub execution_secs: Option<f64>,
    #[serde(rename = "input-staging-data-size-bytes")]
    pub input_staging_data_size_bytes: Option<u64>,
    #[serde(rename = "pilot-scheduled")]
    pub pilot_scheduled: Option<String>,
    #[serde(rename = "staging-time-secs")]
    pub staging_time_secs: Option<f64>,
    #[serde(rename = "status")]
    pub status: TaskStatus,
    #[serde(rename = "submit-time")]
    pub submit_time: String,
    #[serde(rename = "task-id")]
    pub task_id: String,
    #[serde(rename = "wait-time-secs")]
    pub wait_time_secs: Option<f64>,
}

/// Alphabetical field-name order, matching the CSV header (§6).
pub const FIELD_ORDER: [&str; 10] = [
    "completion-time",
    "error-msg",
    "execution-secs",
    "input-staging-data-size-bytes",
    "pilot-scheduled",
    "staging-time-secs",
    "status",
    "submit-time",
    "task-id",
    "wait-time-secs",
];

fn now_iso() -> String {
    DateTime::<Utc>::from(std::time::SystemTime::now())
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Builder used by the Dispatch Core and the Worker Executor Shim, both of
/// which create a `RUNNING` row at submit time and finalize it on
/// completion (§4.1, §4.5).
pub struct TaskMetricsBuilder {
    task_id: String,
    submit_time: String,
    wait_time_secs: Option<f64>,
    staging_time_secs: Option<f64>,
    input_staging_data_size_bytes: Option<u64>,
    pilot_scheduled: Option<String>,
}

impl TaskMetricsBuilder {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            submit_time: now_iso(),
            wait_time_secs: None,
            staging_time_secs: None,
            input_staging_data_size_bytes: None,
            pilot_scheduled: None,
        }
    }

    pub fn running(&self) -> TaskMetrics {
        TaskMetrics {
            completion_time: None,
            error_msg: None,
            execution_secs: None,
            input_staging_data_size_bytes: self.input_staging_data_size_bytes,
            pilot_scheduled: self.pilot_scheduled.clone(),
            staging_time_secs: self.staging_time_secs,
            status: TaskStatus::Running,
            submit_time: self.submit_time.clone(),
            task_id: self.task_id.clone(),
            wait_time_secs: self.wait_time_secs,
        }
    }

    pub fn with_wait_time_secs(mut self, secs: f64) -> Self {
        self.wait_time_secs = Some(secs);
        self
    }

    pub fn with_pilot_scheduled(mut self, pilot: impl Into<String>) -> Self {
        self.pilot_scheduled = Some(pilot.into());
        self
    }

    /// Finalize into a terminal row (§3 invariant 2:
    /// `status != RUNNING` and `completion_time >= submit_time`).
    pub fn finalize(&self, status: TaskStatus, execution_secs: f64, error_msg: Option<String>) -> TaskMetrics {
        debug_assert_ne!(status, TaskStatus::Running);
        TaskMetrics {
            completion_time: Some(now_iso()),
            error_msg,
            execution_secs: Some(round4(execution_secs)),
            input_staging_data_size_bytes: self.input_staging_data_size_bytes,
            pilot_scheduled: self.pilot_scheduled.clone(),
            staging_time_secs: self.staging_time_secs,
            status,
            submit_time: self.submit_time.clone(),
            task_id: self.task_id.clone(),
            wait_time_secs: self.wait_time_secs,
        }
    }
}

/// Numeric durations are recorded with 4-decimal precision (§6).
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_row_has_no_completion_time() {
        let row = TaskMetricsBuilder::new("quantum-1").running();
        assert_eq!(row.status, TaskStatus::Running);
        assert!(row.completion_time.is_none());
    }

    #[test]
    fn finalized_row_is_terminal_and_bounded_below_by_submit_time() {
        let builder = TaskMetricsBuilder::new("quantum-1");
        let row = builder.finalize(TaskStatus::Success, 1.23456, None);
        assert_ne!(row.status, TaskStatus::Running);
        assert!(row.completion_time.unwrap() >= row.submit_time);
        assert_eq!(row.execution_secs, Some(1.2346));
    }
}
