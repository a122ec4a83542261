//! # Edgelink Store
//!
//! Shared server-side stores for the edgelink coordination server.
//!
//! This crate provides:
//! - Data directory layout ([`StoreDir`])
//! - Read-only credential lookup ([`CredentialStore`])
//! - The device registry of currently logged-in devices ([`DeviceRegistry`])
//! - Named numeric data files and aggregate statistics ([`FileStore`])
//! - Append-only upload/deletion audit logs ([`OperationLog`])
//! - The overwrite-on-write AED snapshot ([`SnapshotFile`])
//!
//! # Concurrency
//!
//! Connection handlers run as independent tasks and share these stores
//! behind `Arc`. Every store owning mutable file state serializes its
//! read-modify-write cycles with an internal mutex; handlers never touch raw
//! file state directly. Data-file access is scoped per filename and carries
//! no stronger guarantee than last-writer-wins.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod credentials;
mod dir;
mod error;
mod files;
mod oplog;
mod registry;
mod snapshot;

pub use credentials::CredentialStore;
pub use dir::{StoreDir, DEFAULT_CREDENTIALS_FILE};
pub use error::{StoreError, StoreResult};
pub use files::{FileStore, StatValue};
pub use oplog::OperationLog;
pub use registry::{DeviceRegistry, RegistryEntry};
pub use snapshot::SnapshotFile;

/// Returns the current local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
///
/// Registry and operation-log records all carry this format; `AED` relies on
/// the timestamp being exactly two whitespace-separated tokens when it
/// re-parses registry lines.
#[must_use]
pub fn wall_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_timestamp_has_two_tokens() {
        let ts = wall_timestamp();
        assert_eq!(ts.split_whitespace().count(), 2);
        assert_eq!(ts.len(), "2026-08-04 10:15:00".len());
    }
}
