//! Per-connection protocol handler.
//!
//! One handler owns one client socket for the lifetime of the connection:
//! it runs the login sub-protocol, then the command dispatch loop. All
//! shared state is reached through the stores in [`HandlerContext`], which
//! serialize their own file access; the handler never touches raw file
//! state.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::session::Session;
use edgelink_protocol::{read_field, reply, write_field, Command, StatOp};
use edgelink_store::{
    CredentialStore, DeviceRegistry, FileStore, OperationLog, SnapshotFile, StoreDir, StoreError,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Shared context for connection handling.
///
/// One context is built at startup and shared by every handler task behind
/// an `Arc`.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Credential lookup (external, read-only).
    pub credentials: CredentialStore,
    /// Registry of currently logged-in devices.
    pub registry: DeviceRegistry,
    /// Named numeric data files.
    pub files: FileStore,
    /// Upload audit log.
    pub upload_log: OperationLog,
    /// Deletion audit log.
    pub deletion_log: OperationLog,
    /// AED snapshot writer.
    pub snapshot: SnapshotFile,
}

impl HandlerContext {
    /// Builds the context, opening every store under the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or a store file cannot be
    /// opened.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let dir = StoreDir::open(&config.data_dir)?;

        let credentials =
            CredentialStore::new(&dir.credentials_path(&config.credentials_file));
        let registry = DeviceRegistry::open(&dir.registry_path())?;
        let upload_log = OperationLog::open(&dir.upload_log_path())?;
        let deletion_log = OperationLog::open(&dir.deletion_log_path())?;
        let snapshot = SnapshotFile::new(&dir.snapshot_path());
        let files = FileStore::new(dir);

        Ok(Self {
            config,
            credentials,
            registry,
            files,
            upload_log,
            deletion_log,
            snapshot,
        })
    }
}

/// Handler for one client connection.
pub struct ConnectionHandler<S> {
    stream: S,
    session: Session,
    context: Arc<HandlerContext>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a handler for an accepted connection.
    pub fn new(stream: S, peer: SocketAddr, context: Arc<HandlerContext>) -> Self {
        Self {
            stream,
            session: Session::new(peer),
            context,
        }
    }

    /// Runs the session until the peer disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ConnectionClosed`] if the peer closes the
    /// connection mid-exchange, or any store/socket error. A close between
    /// commands is normal termination and returns `Ok`.
    pub async fn run(mut self) -> ServerResult<()> {
        let peer = self.session.peer();
        info!(peer = %peer, "new connection");

        loop {
            let Some(message) = read_field(&mut self.stream).await? else {
                info!(peer = %peer, "client disconnected");
                return Ok(());
            };

            let token = message.trim();
            if token == "login" {
                self.handle_login().await?;
            } else if let Some(command) = Command::parse(token) {
                if self.session.is_authenticated() {
                    self.dispatch(command).await?;
                } else {
                    debug!(peer = %peer, %command, "command before authentication");
                    self.send(reply::UNRECOGNIZED).await?;
                }
            } else if self.session.is_blocked() {
                // a stray credential field after the block reply
                debug!(peer = %peer, "login traffic while blocked");
                self.send(reply::BLOCKED).await?;
            } else {
                debug!(peer = %peer, token, "unrecognized message");
                self.send(reply::UNRECOGNIZED).await?;
            }
        }
    }

    /// Runs the login sub-protocol.
    ///
    /// Prompts for credentials and loops on invalid pairs until the pair
    /// matches or the failed-attempt limit blocks the session. A blocked
    /// session answers every further login request with the block reply.
    async fn handle_login(&mut self) -> ServerResult<()> {
        if self.session.is_blocked() {
            return self.send(reply::BLOCKED).await;
        }

        self.send(reply::LOGIN_PROMPT).await?;
        self.session.prompt_login();

        loop {
            let pair = self.recv().await?;

            if self.context.credentials.check(&pair)? {
                let username = pair
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                self.send(reply::WELCOME).await?;
                self.session.authenticate(&username);
                info!(peer = %self.session.peer(), username, "login succeeded");

                self.register_device().await?;
                return Ok(());
            }

            if self.session.record_failed_login(self.context.config.max_failed_logins) {
                warn!(peer = %self.session.peer(), "login blocked after repeated failures");
                return self.send(reply::BLOCKED).await;
            }

            debug!(peer = %self.session.peer(), "invalid credentials");
            self.send(reply::INVALID).await?;
        }
    }

    /// Consumes the device-registration field sent after `Welcome` and
    /// records the registry entry. The field gets no reply.
    async fn register_device(&mut self) -> ServerResult<()> {
        let registration = self.recv().await?;

        let fields: Vec<&str> = registration.split_whitespace().collect();
        let [_, ip, port] = fields.as_slice() else {
            warn!(registration, "malformed device registration, entry skipped");
            return Ok(());
        };
        let Ok(udp_port) = port.parse::<u16>() else {
            warn!(registration, "invalid UDP port, entry skipped");
            return Ok(());
        };

        let username = self.session.username().unwrap_or_default().to_string();
        let entry = self.context.registry.record_login(&username, ip, udp_port)?;
        debug!(seq = entry.seq, username, "registry entry written");
        Ok(())
    }

    /// Dispatches one authenticated command exchange.
    async fn dispatch(&mut self, command: Command) -> ServerResult<()> {
        debug!(peer = %self.session.peer(), %command, "command received");
        self.send(command.as_str()).await?;

        match command {
            Command::Ued => self.handle_ued().await,
            Command::Scs => self.handle_scs().await,
            Command::Dte => self.handle_dte().await,
            Command::Aed => self.handle_aed().await,
            Command::Out => self.handle_out().await,
        }
    }

    /// `UED`: record an upload notice. The file itself moves out-of-band,
    /// so nothing here checks for it.
    async fn handle_ued(&mut self) -> ServerResult<()> {
        let username = self.recv().await?;
        let username = username.trim().to_string();
        self.send(&reply::username_ack(&username)).await?;

        let descriptor = self.recv().await?;
        self.context.upload_log.append(&[
            &username,
            &edgelink_store::wall_timestamp(),
            descriptor.trim(),
        ])?;

        info!(username, "upload recorded");
        self.send(reply::UPLOAD_DONE).await
    }

    /// `SCS`: compute a statistic over a data file.
    async fn handle_scs(&mut self) -> ServerResult<()> {
        let op_name = self.recv().await?;
        let file_id = self.recv().await?;
        let file_id = file_id.trim();

        let Some(op) = StatOp::parse(op_name.trim()) else {
            debug!(op = op_name.trim(), "unknown statistic operation");
            return self.send(reply::UNRECOGNIZED).await;
        };

        match self.context.files.aggregate(op, file_id) {
            Ok(result) => {
                info!(%op, file_id, %result, "statistic computed");
                self.send(&reply::stat_result(op, file_id, result)).await
            }
            Err(StoreError::DataFileMissing(_)) => self.send(reply::FILE_MISSING).await,
            Err(StoreError::EmptyDataFile(_)) => self.send(&reply::file_empty(file_id)).await,
            Err(StoreError::InvalidData { .. }) => {
                self.send(&reply::file_invalid(file_id)).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `DTE`: delete a data file and record the deletion.
    async fn handle_dte(&mut self) -> ServerResult<()> {
        let file_id = self.recv().await?;
        let file_id = file_id.trim().to_string();

        if !self.context.files.exists(&file_id) {
            return self.send(reply::FILE_MISSING).await;
        }

        self.send(&reply::file_name_ack(&file_id)).await?;

        let username = self.recv().await?;
        let username = username.trim().to_string();
        self.send(&reply::log_info_ack(&username)).await?;

        let file_field = self.recv().await?;

        match self.context.files.delete(&file_id) {
            Ok(data_amount) => {
                self.context.deletion_log.append(&[
                    &username,
                    &edgelink_store::wall_timestamp(),
                    file_field.trim(),
                    &data_amount.to_string(),
                ])?;
                info!(username, file_id, data_amount, "data file removed");
                self.send(reply::FILE_REMOVED).await
            }
            // lost a race with a concurrent delete
            Err(StoreError::DataFileMissing(_)) => self.send(reply::FILE_MISSING).await,
            Err(e) => Err(e.into()),
        }
    }

    /// `AED`: snapshot the other registered devices for the requester.
    async fn handle_aed(&mut self) -> ServerResult<()> {
        let username = self.recv().await?;
        let username = username.trim();

        let others = match self.context.registry.entries_excluding(username) {
            Ok(others) => others,
            Err(e @ StoreError::Corrupted(_)) => {
                warn!(error = %e, "registry unreadable during AED");
                return self.send(reply::UNRECOGNIZED).await;
            }
            Err(e) => return Err(e.into()),
        };

        self.context.snapshot.write(&others)?;
        debug!(username, others = others.len(), "active-device snapshot written");

        if others.is_empty() {
            self.send(reply::NO_OTHER_DEVICES).await
        } else {
            self.send(reply::OTHER_DEVICES_ACTIVE).await
        }
    }

    /// `OUT`: deregister the device and rewrite the registry.
    async fn handle_out(&mut self) -> ServerResult<()> {
        let username = self.recv().await?;
        let username = username.trim();

        match self.context.registry.remove_user(username) {
            Ok(removed) => {
                info!(username, removed, "device logged out");
                self.send(reply::LOG_REMOVED).await
            }
            Err(e @ StoreError::Corrupted(_)) => {
                warn!(error = %e, "registry unreadable during OUT");
                self.send(reply::UNRECOGNIZED).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn send(&mut self, field: &str) -> ServerResult<()> {
        write_field(&mut self.stream, field).await?;
        Ok(())
    }

    /// Reads the next field of an in-progress exchange.
    async fn recv(&mut self) -> ServerResult<String> {
        read_field(&mut self.stream)
            .await?
            .ok_or(ServerError::ConnectionClosed)
    }
}
