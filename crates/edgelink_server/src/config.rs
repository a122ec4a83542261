//! Server configuration.

use crate::error::{ServerError, ServerResult};
use edgelink_store::DEFAULT_CREDENTIALS_FILE;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Valid range for the failed-login limit.
pub const MAX_FAILED_LOGINS_RANGE: RangeInclusive<u32> = 1..=6;

/// Configuration for the coordination server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Consecutive failed login attempts before a session is blocked.
    pub max_failed_logins: u32,
    /// Directory holding the registry, logs, and data files.
    pub data_dir: PathBuf,
    /// Credential file name within the data directory.
    pub credentials_file: String,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            max_failed_logins: 3,
            data_dir: PathBuf::from("."),
            credentials_file: DEFAULT_CREDENTIALS_FILE.to_string(),
        }
    }

    /// Sets the failed-login limit.
    pub fn with_max_failed_logins(mut self, max: u32) -> Self {
        self.max_failed_logins = max;
        self
    }

    /// Sets the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the credential file name.
    pub fn with_credentials_file(mut self, name: impl Into<String>) -> Self {
        self.credentials_file = name.into();
        self
    }

    /// Validates the configuration.
    ///
    /// The server refuses to start with a failed-login limit outside
    /// [`MAX_FAILED_LOGINS_RANGE`].
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] on an invalid value.
    pub fn validate(&self) -> ServerResult<()> {
        if !MAX_FAILED_LOGINS_RANGE.contains(&self.max_failed_logins) {
            return Err(ServerError::Config(format!(
                "invalid number of allowed failed consecutive attempts: {} (valid range {}-{})",
                self.max_failed_logins,
                MAX_FAILED_LOGINS_RANGE.start(),
                MAX_FAILED_LOGINS_RANGE.end()
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8300)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.max_failed_logins, 3);
        assert_eq!(config.credentials_file, "credentials.txt");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_max_failed_logins(5)
            .with_data_dir("/tmp/edge")
            .with_credentials_file("users.txt");

        assert_eq!(config.max_failed_logins, 5);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/edge"));
        assert_eq!(config.credentials_file, "users.txt");
    }

    #[test]
    fn attempt_limit_range_enforced() {
        for valid in 1..=6 {
            let config = ServerConfig::default().with_max_failed_logins(valid);
            assert!(config.validate().is_ok());
        }

        for invalid in [0, 7, 100] {
            let config = ServerConfig::default().with_max_failed_logins(invalid);
            assert!(matches!(config.validate(), Err(ServerError::Config(_))));
        }
    }
}
