//! Scans the per-run logs written by the search binary and ranks them by
//! the last `Total time: <n> ms` line each one reports.

use std::fs;
use std::path::Path;

use kgr_core::errors::{ErrorInfo, KgrError};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Line emitted by the search binary once a run finishes. Digits and
/// whitespace are ASCII only.
pub const TOTAL_TIME_PATTERN: &str = r"Total time:[\t\n\f\r ]*([0-9]+)[\t\n\f\r ]*ms";

/// Timing extracted from one log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingEntry {
    pub file_name: String,
    pub total_ms: u64,
}

pub struct LogScanner {
    pattern: Regex,
}

impl LogScanner {
    pub fn new() -> Result<Self, KgrError> {
        let pattern = Regex::new(TOTAL_TIME_PATTERN)
            .map_err(|err| KgrError::schema("logscan_pattern", err))?;
        Ok(Self { pattern })
    }

    /// Value of the last matching line. A last match whose number does not
    /// fit yields `None` rather than falling back to an earlier line.
    pub fn last_total_time(&self, text: &str) -> Option<u64> {
        let captures = text
            .lines()
            .rev()
            .find_map(|line| self.pattern.captures(line))?;
        captures.get(1)?.as_str().parse().ok()
    }

    /// Collects timings from the `*.txt` files directly inside `dir`, sorted
    /// ascending by time and then by file name.
    ///
    /// Symlinked logs are read through their target. A missing or unreadable
    /// directory is an error; unreadable files and files without a timing
    /// line are skipped.
    pub fn scan_dir(&self, dir: &Path) -> Result<Vec<TimingEntry>, KgrError> {
        let meta = fs::metadata(dir).map_err(|err| KgrError::io("log_dir_read", dir, err))?;
        if !meta.is_dir() {
            return Err(KgrError::io("log_dir_read", dir, "not a directory"));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("txt")
            {
                continue;
            }
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable log");
                    continue;
                }
            };
            let file_name = entry.file_name().to_string_lossy().into_owned();
            match self.last_total_time(&String::from_utf8_lossy(&bytes)) {
                Some(total_ms) => entries.push(TimingEntry {
                    file_name,
                    total_ms,
                }),
                None => debug!(file = %file_name, "no total time reported"),
            }
        }
        entries.sort_by(|a, b| {
            a.total_ms
                .cmp(&b.total_ms)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(entries)
    }
}

/// The `n` fastest entries of an already sorted ranking.
pub fn top(entries: &[TimingEntry], n: usize) -> Result<&[TimingEntry], KgrError> {
    if n == 0 {
        return Err(KgrError::domain("logscan_top", "top count must be at least one"));
    }
    Ok(&entries[..n.min(entries.len())])
}

/// Plain-text table of the `n` fastest entries.
pub fn render_table(entries: &[TimingEntry], n: usize, dir: &Path) -> Result<String, KgrError> {
    let rows = top(entries, n)?;
    if rows.is_empty() {
        return Ok(format!("No logs found in {}\n", dir.display()));
    }
    let mut lines = vec![
        format!("Top {n} files with lowest total time:"),
        format!("{:<30} {}", "File Name", "Total Time (ms)"),
        "-".repeat(50),
    ];
    lines.extend(
        rows.iter()
            .map(|row| format!("{:<30} {}", row.file_name, row.total_ms)),
    );
    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

fn csv_error(path: &Path, err: csv::Error) -> KgrError {
    KgrError::Io(
        ErrorInfo::new("logscan_csv", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

/// Writes the full ranking as CSV with a `file_name,total_ms` header.
pub fn write_csv(path: &Path, entries: &[TimingEntry]) -> Result<(), KgrError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|err| csv_error(path, err))?;
    for entry in entries {
        wtr.serialize(entry).map_err(|err| csv_error(path, err))?;
    }
    wtr.flush().map_err(|err| KgrError::io("logscan_csv", path, err))
}
