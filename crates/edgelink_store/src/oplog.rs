//! Append-only operation logs.
//!
//! The upload and deletion logs are audit trails: one `; `-separated record
//! per line, appended and never rewritten. Appends run under the log's mutex
//! so concurrent handlers cannot interleave partial records.

use crate::error::StoreResult;
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An append-only audit log backed by one text file.
#[derive(Debug)]
pub struct OperationLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OperationLog {
    /// Opens the log file, creating it empty if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    pub fn open(path: &Path) -> StoreResult<Self> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    /// Appends one record, joining the fields with `"; "`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn append(&self, fields: &[&str]) -> StoreResult<()> {
        let record = fields.join("; ");

        let _guard = self.lock.lock();
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{record}")?;
        file.flush()?;

        debug!(path = %self.path.display(), record, "log record appended");
        Ok(())
    }

    /// Returns every record in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub fn records(&self) -> StoreResult<Vec<String>> {
        let _guard = self.lock.lock();
        let contents = fs::read_to_string(&self.path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }
}
