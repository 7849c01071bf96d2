use std::path::Path;

use kgr_core::errors::{ErrorInfo, KgrError};
use kgr_sweep::serde::to_canonical_json_bytes;
use serde::{Deserialize, Serialize};

use crate::dispatch::OrderingPolicy;

/// Outcome of a single sequence entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum RunStatus {
    /// Still queued when every worker had stopped.
    NotAttempted,
    Completed { elapsed_ms: u64 },
    Failed { error: ErrorInfo },
    /// Never started because its table was not built.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub index: usize,
    pub table_id: usize,
    pub is_table_owner: bool,
    /// Worker that took the run off the queue.
    pub worker: Option<usize>,
    pub status: RunStatus,
}

/// Summary of a whole dispatch, one entry per sequence index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub workers: usize,
    pub ordering: OrderingPolicy,
    pub runs: Vec<RunReport>,
    pub elapsed_ms: u64,
}

impl DispatchReport {
    fn count(&self, pred: impl Fn(&RunStatus) -> bool) -> usize {
        self.runs.iter().filter(|run| pred(&run.status)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|s| matches!(s, RunStatus::Completed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RunStatus::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RunStatus::Skipped { .. }))
    }

    pub fn not_attempted(&self) -> usize {
        self.count(|s| matches!(s, RunStatus::NotAttempted))
    }

    /// Indices whose run failed, in sequence order.
    pub fn failed_indices(&self) -> Vec<usize> {
        self.runs
            .iter()
            .filter(|run| matches!(run.status, RunStatus::Failed { .. }))
            .map(|run| run.index)
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.completed() == self.runs.len()
    }

    /// Writes the report as canonical JSON, creating the parent directory.
    pub fn write_json(&self, path: &Path) -> Result<(), KgrError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| KgrError::io("report_dir", parent, err))?;
        }
        let bytes = to_canonical_json_bytes(self)?;
        std::fs::write(path, bytes).map_err(|err| KgrError::io("report_write", path, err))
    }
}
