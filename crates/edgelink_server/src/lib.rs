//! # Edgelink Server
//!
//! TCP coordination server for edge devices.
//!
//! This crate provides:
//! - The connection acceptor ([`EdgeServer`])
//! - The per-connection protocol handler ([`ConnectionHandler`])
//! - The login sub-protocol and session state machine ([`Session`])
//! - Server configuration ([`ServerConfig`])
//!
//! # Architecture
//!
//! The acceptor spawns one task per connection. Each handler runs the login
//! sub-protocol against the credential store, registers the device, and
//! then dispatches the five protocol commands (`UED`, `SCS`, `DTE`, `AED`,
//! `OUT`) against the shared stores from `edgelink_store`. The stores
//! serialize their own file access, so handlers stay free of locking
//! concerns.
//!
//! # Failure containment
//!
//! A single connection's failure never takes down the acceptor or other
//! sessions: every handler task catches and logs its own error.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;
mod session;

pub use config::{ServerConfig, MAX_FAILED_LOGINS_RANGE};
pub use error::{ServerError, ServerResult};
pub use handler::{ConnectionHandler, HandlerContext};
pub use server::EdgeServer;
pub use session::{Session, SessionState};
