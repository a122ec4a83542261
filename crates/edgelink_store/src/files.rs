//! Data file access and aggregate statistics.
//!
//! Data files are named `<fileId>.txt` where the file id already carries the
//! `<username>-` prefix, and hold one integer per line. The store computes
//! true reductions over the parsed values; access is scoped per filename, so
//! operations on different files never conflict.

use crate::dir::StoreDir;
use crate::error::{StoreError, StoreResult};
use edgelink_protocol::StatOp;
use std::fmt;
use std::fs;
use tracing::debug;

/// Result of an aggregate computation.
///
/// `AVERAGE` produces a float; the other operations stay integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    /// Integral result (`SUM`, `MAX`, `MIN`).
    Int(i64),
    /// Floating result (`AVERAGE`).
    Float(f64),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Int(v) => write!(f, "{v}"),
            StatValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Store of named numeric data files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: StoreDir,
}

impl FileStore {
    /// Creates a file store over the given data directory.
    pub fn new(dir: StoreDir) -> Self {
        Self { dir }
    }

    /// Returns true if the data file exists.
    #[must_use]
    pub fn exists(&self, file_id: &str) -> bool {
        self.dir.data_file_path(file_id).exists()
    }

    /// Counts the values in a data file without parsing them.
    ///
    /// This is the "data amount" recorded by the deletion log; it counts
    /// non-empty lines so it works even on a file with malformed content.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataFileMissing`] if the file is absent.
    pub fn line_count(&self, file_id: &str) -> StoreResult<usize> {
        let contents = self.read(file_id)?;
        Ok(contents.lines().filter(|l| !l.trim().is_empty()).count())
    }

    /// Parses every value in a data file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataFileMissing`] if the file is absent, or
    /// [`StoreError::InvalidData`] on the first line that does not parse as
    /// an integer.
    pub fn read_values(&self, file_id: &str) -> StoreResult<Vec<i64>> {
        let contents = self.read(file_id)?;
        contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| {
                line.parse::<i64>().map_err(|_| StoreError::InvalidData {
                    file: format!("{file_id}.txt"),
                    line: line.to_string(),
                })
            })
            .collect()
    }

    /// Computes an aggregate statistic over a data file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataFileMissing`] if the file is absent,
    /// [`StoreError::EmptyDataFile`] if it holds no values, or
    /// [`StoreError::InvalidData`] on a malformed line.
    pub fn aggregate(&self, op: StatOp, file_id: &str) -> StoreResult<StatValue> {
        let values = self.read_values(file_id)?;
        if values.is_empty() {
            return Err(StoreError::EmptyDataFile(format!("{file_id}.txt")));
        }

        let sum: i64 = values.iter().sum();
        let result = match op {
            StatOp::Sum => StatValue::Int(sum),
            StatOp::Average => StatValue::Float(sum as f64 / values.len() as f64),
            // values is non-empty, so max/min exist
            StatOp::Max => StatValue::Int(values.iter().copied().max().unwrap_or(i64::MIN)),
            StatOp::Min => StatValue::Int(values.iter().copied().min().unwrap_or(i64::MAX)),
        };

        debug!(%op, file_id, %result, "aggregate computed");
        Ok(result)
    }

    /// Deletes a data file, returning its pre-deletion value count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataFileMissing`] if the file is absent.
    pub fn delete(&self, file_id: &str) -> StoreResult<usize> {
        let data_amount = self.line_count(file_id)?;
        fs::remove_file(self.dir.data_file_path(file_id))?;
        debug!(file_id, data_amount, "data file deleted");
        Ok(data_amount)
    }

    fn read(&self, file_id: &str) -> StoreResult<String> {
        let path = self.dir.data_file_path(file_id);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::DataFileMissing(format!("{file_id}.txt")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn store_with_file(file_id: &str, contents: &str) -> (tempfile::TempDir, FileStore) {
        let temp = tempdir().unwrap();
        let dir = StoreDir::open(temp.path()).unwrap();
        fs::write(dir.data_file_path(file_id), contents).unwrap();
        (temp, FileStore::new(dir))
    }

    #[test]
    fn aggregates_over_sample_values() {
        let (_temp, store) = store_with_file("alice-1", "3\n1\n4\n1\n5\n");

        assert_eq!(
            store.aggregate(StatOp::Sum, "alice-1").unwrap(),
            StatValue::Int(14)
        );
        assert_eq!(
            store.aggregate(StatOp::Average, "alice-1").unwrap(),
            StatValue::Float(2.8)
        );
        assert_eq!(
            store.aggregate(StatOp::Max, "alice-1").unwrap(),
            StatValue::Int(5)
        );
        assert_eq!(
            store.aggregate(StatOp::Min, "alice-1").unwrap(),
            StatValue::Int(1)
        );
    }

    #[test]
    fn aggregates_handle_negatives() {
        let (_temp, store) = store_with_file("alice-2", "-7\n2\n-3\n");

        assert_eq!(
            store.aggregate(StatOp::Sum, "alice-2").unwrap(),
            StatValue::Int(-8)
        );
        assert_eq!(
            store.aggregate(StatOp::Max, "alice-2").unwrap(),
            StatValue::Int(2)
        );
        assert_eq!(
            store.aggregate(StatOp::Min, "alice-2").unwrap(),
            StatValue::Int(-7)
        );
    }

    #[test]
    fn missing_file_reported() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(StoreDir::open(temp.path()).unwrap());

        assert!(!store.exists("ghost-1"));
        assert!(matches!(
            store.aggregate(StatOp::Sum, "ghost-1"),
            Err(StoreError::DataFileMissing(_))
        ));
        assert!(matches!(
            store.delete("ghost-1"),
            Err(StoreError::DataFileMissing(_))
        ));
    }

    #[test]
    fn empty_file_reported() {
        let (_temp, store) = store_with_file("alice-3", "");

        assert!(matches!(
            store.aggregate(StatOp::Sum, "alice-3"),
            Err(StoreError::EmptyDataFile(_))
        ));
    }

    #[test]
    fn malformed_line_reported() {
        let (_temp, store) = store_with_file("alice-4", "1\ntwo\n3\n");

        assert!(matches!(
            store.aggregate(StatOp::Sum, "alice-4"),
            Err(StoreError::InvalidData { .. })
        ));
        // the data amount is still countable
        assert_eq!(store.line_count("alice-4").unwrap(), 3);
    }

    #[test]
    fn delete_returns_pre_deletion_count() {
        let (_temp, store) = store_with_file("alice-5", "1\n2\n3\n4\n");

        assert_eq!(store.delete("alice-5").unwrap(), 4);
        assert!(!store.exists("alice-5"));
        assert!(matches!(
            store.delete("alice-5"),
            Err(StoreError::DataFileMissing(_))
        ));
    }

    #[test]
    fn trailing_newline_not_counted() {
        let (_temp, store) = store_with_file("alice-6", "1\n2\n");

        assert_eq!(store.line_count("alice-6").unwrap(), 2);
        assert_eq!(store.read_values("alice-6").unwrap(), vec![1, 2]);
    }
}
