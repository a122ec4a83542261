//! # Edgelink Protocol
//!
//! Wire vocabulary for the edgelink coordination protocol.
//!
//! This crate provides:
//! - Field framing over a byte stream (one logical field per transport
//!   write/read, no delimiters)
//! - Command tokens recognized by the server
//! - Statistic operation names for `SCS`
//! - The fixed reply strings and reply formatters the server sends
//!
//! # Framing
//!
//! The protocol is deliberately minimal: each side sends exactly one logical
//! field per socket write, and the peer consumes it with a single read of at
//! most [`MAX_FIELD_BYTES`]. Message boundaries are not otherwise marked, so
//! both sides must send exactly the expected number of fields in the expected
//! order. See [`frame`] for the read/write helpers.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod command;
pub mod frame;
pub mod reply;

pub use command::{Command, StatOp};
pub use frame::{read_field, write_field, MAX_FIELD_BYTES};
