//! AED snapshot file.
//!
//! The snapshot is the out-of-band channel for `AED` results: the server
//! overwrites it with the current "other active devices" view and the client
//! reads the file directly. Writes are serialized and atomic so a client
//! read never observes a half-written snapshot.

use crate::error::StoreResult;
use crate::registry::RegistryEntry;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The shared active-devices snapshot writer.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SnapshotFile {
    /// Creates a snapshot writer for the given path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Overwrites the snapshot with the given entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn write(&self, entries: &[RegistryEntry]) -> StoreResult<()> {
        let _guard = self.lock.lock();

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        for entry in entries {
            writeln!(
                file,
                "device: {} / timestamp: {} / ip_address: {} / UDP_port: {}",
                entry.username, entry.timestamp, entry.ip, entry.udp_port
            )?;
        }
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
