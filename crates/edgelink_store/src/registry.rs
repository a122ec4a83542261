//! Device registry: the record of currently logged-in devices.
//!
//! The registry is one text file, `seq; timestamp username ip udp_port` per
//! line. Sequence numbers are dense and contiguous starting at 1 after every
//! mutation; removals renumber the remaining entries.
//!
//! Every operation takes the internal lock for its entire read-modify-write
//! cycle. Handlers share one `DeviceRegistry` behind an `Arc` and never touch
//! the file directly, so concurrent logins and logouts cannot lose updates or
//! observe a half-rewritten file.

use crate::error::{StoreError, StoreResult};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One registry record: a device that is currently logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Position in the registry, contiguous from 1.
    pub seq: u64,
    /// Login timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Device username.
    pub username: String,
    /// Device IP address.
    pub ip: String,
    /// Device UDP port.
    pub udp_port: u16,
}

impl RegistryEntry {
    /// Parses one registry line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] if the line does not match the
    /// record format.
    pub fn parse(line: &str) -> StoreResult<Self> {
        let corrupted = || StoreError::Corrupted(line.to_string());

        let (seq_part, rest) = line.split_once(';').ok_or_else(corrupted)?;
        let seq = seq_part.trim().parse::<u64>().map_err(|_| corrupted())?;

        // timestamp is two whitespace-separated tokens (date, time)
        let fields: Vec<&str> = rest.split_whitespace().collect();
        let [date, time, username, ip, port] = fields.as_slice() else {
            return Err(corrupted());
        };
        let udp_port = port.parse::<u16>().map_err(|_| corrupted())?;

        Ok(Self {
            seq,
            timestamp: format!("{date} {time}"),
            username: (*username).to_string(),
            ip: (*ip).to_string(),
            udp_port,
        })
    }

    /// Formats this entry as one registry line (no trailing newline).
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}; {} {} {} {}",
            self.seq, self.timestamp, self.username, self.ip, self.udp_port
        )
    }
}

/// The shared device registry store.
///
/// # Thread Safety
///
/// All mutation and scanning runs under one internal mutex, making the
/// read-filter-rewrite cycles of login and logout atomic with respect to
/// each other.
#[derive(Debug)]
pub struct DeviceRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl DeviceRegistry {
    /// Opens the registry file, creating it empty if missing.
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

    /// Records a successful login.
    ///
    /// If the username is already registered the old entry is replaced in
    /// place, keeping at most one entry per username. The new entry always
    /// lands at the end of the registry with the next sequence number.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupted registry line.
    pub fn record_login(
        &self,
        username: &str,
        ip: &str,
        udp_port: u16,
    ) -> StoreResult<RegistryEntry> {
        let _guard = self.lock.lock();

        let mut entries = self.load()?;
        let had_entry = entries.len();
        entries.retain(|e| e.username != username);
        if entries.len() < had_entry {
            debug!(username, "replacing existing registry entry");
        }

        entries.push(RegistryEntry {
            seq: 0, // assigned by renumber below
            timestamp: crate::wall_timestamp(),
            username: username.to_string(),
            ip: ip.to_string(),
            udp_port,
        });

        renumber(&mut entries);
        self.persist(&entries)?;

        debug!(username, ip, udp_port, "device registered");
        Ok(entries[entries.len() - 1].clone())
    }

    /// Removes every entry for the given username and renumbers the rest.
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupted registry line.
    pub fn remove_user(&self, username: &str) -> StoreResult<usize> {
        let _guard = self.lock.lock();

        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.username != username);
        let removed = before - entries.len();

        renumber(&mut entries);
        self.persist(&entries)?;

        debug!(username, removed, "device deregistered");
        Ok(removed)
    }

    /// Returns every registry entry in order.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupted registry line.
    pub fn entries(&self) -> StoreResult<Vec<RegistryEntry>> {
        let _guard = self.lock.lock();
        self.load()
    }

    /// Returns every entry whose username differs from the given one.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupted registry line.
    pub fn entries_excluding(&self, username: &str) -> StoreResult<Vec<RegistryEntry>> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.retain(|e| e.username != username);
        Ok(entries)
    }

    /// Reads and parses the registry file. Callers hold the lock.
    fn load(&self) -> StoreResult<Vec<RegistryEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(RegistryEntry::parse)
            .collect()
    }

    /// Rewrites the registry file atomically. Callers hold the lock.
    ///
    /// Write-then-rename keeps readers of the path from ever observing a
    /// half-written registry.
    fn persist(&self, entries: &[RegistryEntry]) -> StoreResult<()> {
        let temp_path = self.path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        for entry in entries {
            writeln!(file, "{}", entry.to_line())?;
        }
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// Reassigns sequence numbers contiguously from 1, preserving order.
fn renumber(entries: &mut [RegistryEntry]) {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.seq = (i + 1) as u64;
    }
}
