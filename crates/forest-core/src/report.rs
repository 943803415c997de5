//! Run reports produced by batch runs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{JobKind, JobOutcome, JobResult, ModelId};

/// Outcome of one job issued for a declared task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub task_name: String,
    pub model_id: ModelId,
    pub kind: JobKind,
    pub outcome: JobOutcome<JobResult>,
    pub elapsed_ms: u64,
}

/// Ordered record of a batch run.
///
/// Entries follow task declaration order: a task's Train entry, then its
/// Predict entry if one was issued.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Set when the run stopped before every task was issued.
    pub cancelled: bool,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    /// Start an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            cancelled: false,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Close the report.
    pub fn finish(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
        self.finished_at = Some(Utc::now());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// True when the run completed and every entry succeeded.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed() == 0
    }

    /// Entries recorded for one task, in issue order.
    pub fn entries_for<'a>(&'a self, task_name: &'a str) -> impl Iterator<Item = &'a ReportEntry> {
        self.entries.iter().filter(move |e| e.task_name == task_name)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
