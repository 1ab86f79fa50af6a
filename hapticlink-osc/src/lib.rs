//! OSC-over-UDP transport for HapticLink
//!
//! ## Overview
//!
//! This crate carries everything the core engine deliberately leaves out:
//! the OSC wire format, the UDP sockets on both sides, file configuration,
//! and the bridge binary gluing them together.
//!
//! ```text
//! avatar client ──UDP──▶ server ──▶ codec ──▶ Router::dispatch
//!                                                   │
//!                    device target ◀── sender ◀─────┤ Forward
//!                    default target ◀── raw bytes ◀─┘ Passthrough
//! ```
//!
//! ## Transport characteristics
//!
//! Everything is fire-and-forget datagrams:
//! - No delivery confirmation, no retry. Loss is acceptable by design;
//!   the next sample supersedes the lost one within tens of milliseconds.
//! - Sends never block the receive loop beyond the OS send buffer.
//! - A malformed datagram is logged and dropped; the loop never exits on
//!   bad input.
//!
//! ## Module organization
//!
//! - [`codec`] - minimal OSC 1.0 message encoding/decoding
//! - [`sender`] - outbound fire-and-forget UDP sender with counters
//! - [`server`] - blocking receive loop wired to the core router
//! - [`config`] - JSON file configuration mapped onto the core arena

pub mod codec;
pub mod config;
pub mod sender;
pub mod server;

pub use codec::{CodecError, OscArg, OscMessage};
pub use config::BridgeConfig;
pub use sender::OscSender;
pub use server::{ForwardStats, OscBridge};

use thiserror::Error;

/// Fatal bridge construction errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Config file could not be read or a socket could not be bound
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config content was rejected by the core validator
    #[error("invalid configuration: {0}")]
    Config(#[from] hapticlink_core::ConfigError),
}
