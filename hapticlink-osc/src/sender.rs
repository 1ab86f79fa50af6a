//! Outbound fire-and-forget UDP sender
//!
//! One unconnected socket serves every outbound destination: computed
//! intensities go to per-device targets, unmatched messages to the default
//! target. Send failures are logged and counted, never retried - datagram
//! semantics assume loss is acceptable, and a failing send must not stall
//! the receive loop.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use log::warn;

use crate::codec;

/// Send counters, reported by the server's periodic stats line
#[derive(Debug, Default, Clone, Copy)]
pub struct SendStats {
    /// Datagrams handed to the OS successfully
    pub messages_sent: u64,
    /// Datagrams the OS refused
    pub messages_failed: u64,
}

/// Fire-and-forget OSC sender over one UDP socket
pub struct OscSender {
    socket: UdpSocket,
    stats: SendStats,
}

impl OscSender {
    /// Bind an ephemeral local socket for outbound traffic
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            socket: UdpSocket::bind(("0.0.0.0", 0))?,
            stats: SendStats::default(),
        })
    }

    /// Encode and send one float message; failures are logged and dropped
    pub fn send(&mut self, target: SocketAddr, address: &str, value: f32) {
        let datagram = codec::encode_float(address, value);
        self.send_raw(target, &datagram);
    }

    /// Forward an already-encoded datagram verbatim
    pub fn send_raw(&mut self, target: SocketAddr, datagram: &[u8]) {
        match self.socket.send_to(datagram, target) {
            Ok(_) => self.stats.messages_sent += 1,
            Err(e) => {
                self.stats.messages_failed += 1;
                warn!("send to {target} failed: {e}");
            }
        }
    }

    /// Counters since construction
    pub fn stats(&self) -> SendStats {
        self.stats
    }
}
