//! Read-only credential lookup.

use crate::error::StoreResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only view of the credential file.
///
/// The file holds one `username password` pair per line and is maintained
/// outside this system. Lookups re-read the file so external edits take
/// effect without a restart.
///
/// Matching is exact whole-line string equality against `"username password"`
/// — no partial matching, no hashing.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a credential store backed by the given file.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Returns the path to the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks whether a `"username password"` pair exists in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential file cannot be read.
    pub fn check(&self, pair: &str) -> StoreResult<bool> {
        let contents = fs::read_to_string(&self.path)?;
        let wanted = pair.trim_end_matches(['\r', '\n']);
        Ok(contents
            .lines()
            .any(|line| line.trim_end_matches('\r') == wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn store_with(contents: &str) -> (tempfile::TempDir, CredentialStore) {
        let temp = tempdir().unwrap();
        let path = temp.path().join("credentials.txt");
        fs::write(&path, contents).unwrap();
        (temp, CredentialStore::new(&path))
    }

    #[test]
    fn valid_pair_matches() {
        let (_temp, store) = store_with("alice secret\nbob hunter2\n");

        assert!(store.check("alice secret").unwrap());
        assert!(store.check("bob hunter2").unwrap());
    }

    #[test]
    fn wrong_password_rejected() {
        let (_temp, store) = store_with("alice secret\n");

        assert!(!store.check("alice wrong").unwrap());
        assert!(!store.check("mallory secret").unwrap());
    }

    #[test]
    fn no_partial_matching() {
        let (_temp, store) = store_with("alice secretlonger\n");

        assert!(!store.check("alice secret").unwrap());
        assert!(!store.check("alice").unwrap());
    }

    #[test]
    fn trailing_newline_in_probe_ignored() {
        let (_temp, store) = store_with("alice secret\n");

        assert!(store.check("alice secret\n").unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let store = CredentialStore::new(&temp.path().join("absent.txt"));

        assert!(store.check("alice secret").is_err());
    }
}
