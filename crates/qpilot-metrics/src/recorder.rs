//! Append-only CSV metrics sink (§3, §4.1(d), §4.5(7), §5).
//!
//! Grounded on `original_source/pilot/pilot_compute_service.py`'s
//! `METRICS`/`SORTED_METRICS_FIELDS` module globals and its
//! `csv.DictWriter` that writes the header exactly once, on first write,
//! guarded by a module-level lock. `csv::Writer` replaces `DictWriter`;
//! the `Mutex<()>` below replaces the Python lock and additionally
//! serializes the "does the file already have a header" check against
//! the write itself, so two racing recorders can't both decide to write
//! a header.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use qpilot_types::metrics::{TaskMetrics, FIELD_ORDER};

use crate::error::MetricsResult;

/// One CSV file, one writer lock. Every `append` call is a single
/// complete row (§3 invariant: exactly one metrics row per task
/// invocation).
pub struct MetricsRecorder {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MetricsRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if this is the file's
    /// first write.
    pub fn append(&self, row: &TaskMetrics) -> MetricsResult<()> {
        let _guard = self.lock.lock().unwrap();

        let needs_header = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            writer.write_record(FIELD_ORDER)?;
        }
        writer.serialize(row)?;
        writer.flush()?;

        tracing::debug!(path = %self.path.display(), task_id = %row.task_id, "recorded task metrics");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qpilot_types::metrics::{TaskMetricsBuilder, TaskStatus};

    fn sample(task_id: &str) -> TaskMetrics {
        TaskMetricsBuilder::new(task_id)
            .with_pilot_scheduled("sim0")
            .finalize(TaskStatus::Success, 1.0, None)
    }

    #[test]
    fn header_is_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let recorder = MetricsRecorder::new(&path);

        recorder.append(&sample("task-1")).unwrap();
        recorder.append(&sample("task-2")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header_line = FIELD_ORDER.join(",");
        let header_count = contents.lines().filter(|line| *line == header_line).count();
        assert_eq!(header_count, 1);
    }

    #[test]
    fn one_row_per_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let recorder = MetricsRecorder::new(&path);

        for i in 0..5 {
            recorder.append(&sample(&format!("task-{i}"))).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 6); // header + 5 rows
    }

    #[test]
    fn reopening_an_existing_file_does_not_duplicate_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");

        MetricsRecorder::new(&path).append(&sample("task-1")).unwrap();
        MetricsRecorder::new(&path).append(&sample("task-2")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header_line = FIELD_ORDER.join(",");
        assert_eq!(contents.lines().filter(|line| *line == header_line).count(), 1);
        assert_eq!(contents.lines().count(), 3);
    }
}
