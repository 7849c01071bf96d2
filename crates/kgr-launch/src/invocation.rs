use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kgr_sweep::{ConfigurationRecord, SchemeArgs};
use serde::{Deserialize, Serialize};

/// Settings shared by every run of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSettings {
    /// External search binary.
    pub binary: PathBuf,
    /// Directory receiving `test-<index>.txt` logs.
    pub logs_dir: PathBuf,
    /// Directory receiving `table_<index>.bin` tables.
    pub tables_dir: PathBuf,
    /// Secret bit length forwarded through `-s`.
    pub secret_size: u32,
    /// Pre-generated secrets resource forwarded through `-b`.
    pub secrets_path: PathBuf,
}

pub fn log_path(logs_dir: &Path, index: usize) -> PathBuf {
    logs_dir.join(format!("test-{index}.txt"))
}

pub fn table_path(tables_dir: &Path, index: usize) -> PathBuf {
    tables_dir.join(format!("table_{index}.bin"))
}

/// Where a captured run writes the child's stdout and stderr.
pub fn console_path(logs_dir: &Path, index: usize) -> PathBuf {
    logs_dir.join(format!("test-{index}.console.log"))
}

/// Fully resolved command line for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub index: usize,
    pub table_id: usize,
    pub is_table_owner: bool,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub log_path: PathBuf,
    pub table_path: PathBuf,
    pub console_path: PathBuf,
}

impl Invocation {
    /// Builds the argument vector: scheme flags, then `-l -p -w -s -b`.
    ///
    /// Paths are passed through as-is, so non-UTF-8 names reach the binary
    /// unchanged.
    pub fn build<P: SchemeArgs>(
        index: usize,
        record: &ConfigurationRecord<P>,
        settings: &LaunchSettings,
    ) -> Self {
        let log_path = log_path(&settings.logs_dir, index);
        let table_path = table_path(&settings.tables_dir, index);
        let mut args = Vec::with_capacity(22);
        for (flag, value) in record.params.scheme_args() {
            args.push(OsString::from(flag));
            args.push(OsString::from(value));
        }
        let trailing = [
            ("-l", log_path.clone().into_os_string()),
            ("-p", table_path.clone().into_os_string()),
            ("-w", u8::from(record.is_table_owner).to_string().into()),
            ("-s", settings.secret_size.to_string().into()),
            ("-b", settings.secrets_path.clone().into_os_string()),
        ];
        for (flag, value) in trailing {
            args.push(OsString::from(flag));
            args.push(value);
        }
        Self {
            index,
            table_id: record.table_id,
            is_table_owner: record.is_table_owner,
            program: settings.binary.clone(),
            args,
            log_path,
            table_path,
            console_path: console_path(&settings.logs_dir, index),
        }
    }
}
