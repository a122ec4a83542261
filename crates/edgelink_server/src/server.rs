//! Connection acceptor.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{ConnectionHandler, HandlerContext};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

/// The coordination server.
///
/// Binds a TCP listener and spawns one handler task per accepted
/// connection. The accept loop never blocks on a handler, and a handler
/// failure is contained to its own session.
///
/// # Example
///
/// ```no_run
/// use edgelink_server::{EdgeServer, ServerConfig};
///
/// # async fn run() -> edgelink_server::ServerResult<()> {
/// let config = ServerConfig::new("0.0.0.0:8300".parse().unwrap());
/// let server = EdgeServer::bind(config).await?;
/// server.run().await
/// # }
/// ```
pub struct EdgeServer {
    listener: TcpListener,
    context: Arc<HandlerContext>,
}

impl EdgeServer {
    /// Validates the configuration, opens the stores, and binds the
    /// listener.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid configuration, an unopenable data
    /// directory, or a bind failure.
    pub async fn bind(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_addr).await?;
        let context = Arc::new(HandlerContext::new(config)?);

        Ok(Self { listener, context })
    }

    /// Returns the bound listen address.
    ///
    /// # Errors
    ///
    /// Returns an error if the local address cannot be read.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process exits.
    ///
    /// # Errors
    ///
    /// Individual accept failures are logged and do not end the loop; this
    /// only returns on unrecoverable listener errors (currently never).
    pub async fn run(self) -> ServerResult<()> {
        info!(addr = %self.local_addr()?, "server listening");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => self.spawn_handler(stream, peer),
                Err(err) => warn!(error = %err, "failed to accept connection"),
            }
        }
    }

    fn spawn_handler(&self, stream: TcpStream, peer: SocketAddr) {
        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            let handler = ConnectionHandler::new(stream, peer, context);
            match handler.run().await {
                Ok(()) => {}
                Err(err) if err.is_disconnect() => {
                    info!(peer = %peer, "session ended mid-exchange")
                }
                Err(err) => warn!(peer = %peer, error = %err, "session failed"),
            }
        });
    }
}
