//! Data directory management.
//!
//! This module handles the file system layout the server works against:
//!
//! ```text
//! <data_dir>/
//! ├─ credentials.txt           # Credential store (external, read-only)
//! ├─ edge-device-log.txt       # Device registry
//! ├─ upload-log.txt            # Upload operation log
//! ├─ deletion-log.txt          # Deletion operation log
//! ├─ other_active_devices.txt  # AED snapshot (overwritten per call)
//! └─ <username>-<fileId>.txt   # Data files, one integer per line
//! ```
//!
//! The file names are protocol surface: clients read the snapshot and data
//! files out-of-band by these exact names.

use crate::error::StoreResult;
use std::fs;
use std::path::{Path, PathBuf};

/// File names within the data directory.
const REGISTRY_FILE: &str = "edge-device-log.txt";
const UPLOAD_LOG_FILE: &str = "upload-log.txt";
const DELETION_LOG_FILE: &str = "deletion-log.txt";
const SNAPSHOT_FILE: &str = "other_active_devices.txt";

/// Default credential store file name.
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.txt";

/// Manages the data directory layout.
///
/// # Example
///
/// ```no_run
/// use edgelink_store::StoreDir;
/// use std::path::Path;
///
/// let dir = StoreDir::open(Path::new("server-data")).unwrap();
/// println!("registry: {:?}", dir.registry_path());
/// ```
#[derive(Debug, Clone)]
pub struct StoreDir {
    path: PathBuf,
}

impl StoreDir {
    /// Opens the data directory, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Returns the data directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the device registry file.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.path.join(REGISTRY_FILE)
    }

    /// Returns the path to the upload log.
    #[must_use]
    pub fn upload_log_path(&self) -> PathBuf {
        self.path.join(UPLOAD_LOG_FILE)
    }

    /// Returns the path to the deletion log.
    #[must_use]
    pub fn deletion_log_path(&self) -> PathBuf {
        self.path.join(DELETION_LOG_FILE)
    }

    /// Returns the path to the AED snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.path.join(SNAPSHOT_FILE)
    }

    /// Returns the path to a credential store file.
    #[must_use]
    pub fn credentials_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Returns the path to a data file.
    ///
    /// The file id is the full name already including the `<username>-`
    /// prefix; only the `.txt` extension is appended here.
    #[must_use]
    pub fn data_file_path(&self, file_id: &str) -> PathBuf {
        self.path.join(format!("{file_id}.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_directory() {
        let temp = tempdir().unwrap();
        let data_path = temp.path().join("server-data");

        assert!(!data_path.exists());

        let dir = StoreDir::open(&data_path).unwrap();
        assert!(data_path.exists());
        assert_eq!(dir.path(), data_path);
    }

    #[test]
    fn paths_are_correct() {
        let temp = tempdir().unwrap();
        let dir = StoreDir::open(temp.path()).unwrap();

        assert_eq!(dir.registry_path(), temp.path().join("edge-device-log.txt"));
        assert_eq!(dir.upload_log_path(), temp.path().join("upload-log.txt"));
        assert_eq!(dir.deletion_log_path(), temp.path().join("deletion-log.txt"));
        assert_eq!(
            dir.snapshot_path(),
            temp.path().join("other_active_devices.txt")
        );
        assert_eq!(
            dir.credentials_path(DEFAULT_CREDENTIALS_FILE),
            temp.path().join("credentials.txt")
        );
    }

    #[test]
    fn data_file_path_appends_extension() {
        let temp = tempdir().unwrap();
        let dir = StoreDir::open(temp.path()).unwrap();

        assert_eq!(
            dir.data_file_path("alice-1"),
            temp.path().join("alice-1.txt")
        );
    }
}
