use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use kgr_core::errors::{ErrorInfo, KgrError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dedup::Partition;

/// One sweep point plus its table assignment.
///
/// Persisted as a flat JSON object: the scheme fields followed by
/// `tableNum` and `allowWriteTable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord<P> {
    #[serde(flatten)]
    pub params: P,
    #[serde(rename = "tableNum")]
    pub table_id: usize,
    #[serde(rename = "allowWriteTable")]
    pub is_table_owner: bool,
}

/// Dispatch-ordered list of records: every table owner first, then every
/// record that reuses a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationSequence<P> {
    records: Vec<ConfigurationRecord<P>>,
}

impl<P> ConfigurationSequence<P> {
    /// Concatenates owners and reusers, preserving enumeration order in each,
    /// and checks the result like [`Self::from_records`].
    pub fn from_partition(partition: Partition<P>) -> Result<Self, KgrError> {
        let Partition { mut owners, reuse } = partition;
        owners.extend(reuse);
        Self::from_records(owners)
    }

    /// Wraps records read from elsewhere after checking the ordering invariant.
    pub fn from_records(records: Vec<ConfigurationRecord<P>>) -> Result<Self, KgrError> {
        let sequence = Self { records };
        sequence.validate()?;
        Ok(sequence)
    }

    pub fn records(&self) -> &[ConfigurationRecord<P>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct tables, i.e. the length of the owner prefix.
    pub fn table_count(&self) -> usize {
        self.records
            .iter()
            .take_while(|record| record.is_table_owner)
            .count()
    }

    /// Checks the owner-prefix invariant and returns the table count.
    ///
    /// The first `G` records must be owners holding every id in `0..G`
    /// exactly once; every later record must be a reuser of an id below `G`.
    pub fn validate(&self) -> Result<usize, KgrError> {
        let tables = self.table_count();
        let mut seen = vec![false; tables];
        for (index, record) in self.records.iter().enumerate() {
            if index < tables {
                if record.table_id >= tables || seen[record.table_id] {
                    return Err(invariant_error(
                        "owner table id is out of range or repeated",
                        index,
                        record.table_id,
                    ));
                }
                seen[record.table_id] = true;
            } else if record.is_table_owner {
                return Err(invariant_error(
                    "table owner found after the owner prefix",
                    index,
                    record.table_id,
                ));
            } else if record.table_id >= tables {
                return Err(invariant_error(
                    "reuse record references an unknown table",
                    index,
                    record.table_id,
                ));
            }
        }
        Ok(tables)
    }
}

fn invariant_error(message: &str, index: usize, table_id: usize) -> KgrError {
    KgrError::Schema(
        ErrorInfo::new("sequence_invariant", message)
            .with_context("index", index.to_string())
            .with_context("table", table_id.to_string()),
    )
}

impl<P: Serialize> ConfigurationSequence<P> {
    /// Streams the sequence to `path` as a JSON array, one record per line.
    pub fn write_json(&self, path: &Path) -> Result<(), KgrError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| KgrError::io("sequence_dir", parent, err))?;
        }
        let file = File::create(path).map_err(|err| KgrError::io("sequence_create", path, err))?;
        let mut writer = BufWriter::new(file);
        let io_err = |err: std::io::Error| KgrError::io("sequence_write", path, err);
        writer.write_all(b"[").map_err(io_err)?;
        for (index, record) in self.records.iter().enumerate() {
            if index > 0 {
                writer.write_all(b",").map_err(io_err)?;
            }
            writer.write_all(b"\n").map_err(io_err)?;
            serde_json::to_writer(&mut writer, record)
                .map_err(|err| KgrError::schema("sequence_encode", err))?;
        }
        writer.write_all(b"\n]\n").map_err(io_err)?;
        writer.flush().map_err(io_err)
    }
}

impl<P: DeserializeOwned> ConfigurationSequence<P> {
    /// Reads and validates a sequence written by [`ConfigurationSequence::write_json`].
    pub fn read_json(path: &Path) -> Result<Self, KgrError> {
        let file = File::open(path).map_err(|err| KgrError::io("sequence_open", path, err))?;
        let records: Vec<ConfigurationRecord<P>> =
            serde_json::from_reader(BufReader::new(file)).map_err(|err| {
                KgrError::Schema(
                    ErrorInfo::new("sequence_decode", err.to_string())
                        .with_context("path", path.display().to_string()),
                )
            })?;
        Self::from_records(records)
    }
}
