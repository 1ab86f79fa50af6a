//! Blocking UDP receive loop
//!
//! One datagram in, at most one datagram out. Each arrival is decoded,
//! dispatched through the core router, and the dispatch outcome performed:
//! computed intensities go to the device's target at the arrival address,
//! unmatched datagrams are forwarded byte-for-byte to the default target.
//!
//! The router sits behind a mutex: the device position-vector update is a
//! read-modify-write that must never interleave, and the lock keeps the
//! bridge safe to share even though the loop itself is single-threaded.
//!
//! Per-message failures (malformed datagrams, dispatch errors) are logged
//! and dropped; only socket-level failures on the listen socket end the
//! loop.

use std::io;
use std::net::SocketAddr;
use std::net::UdpSocket;
use std::sync::Mutex;

use log::{debug, error, info, warn};

use hapticlink_core::{Dispatch, Router};

use crate::codec;
use crate::sender::OscSender;

/// Largest datagram the loop will read
pub const MAX_DATAGRAM: usize = 1536;

/// How many received datagrams between periodic stats lines
const STATS_INTERVAL: u64 = 256;

/// Receive-loop counters
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardStats {
    /// Datagrams received
    pub received: u64,
    /// Detector samples recorded (no outbound traffic)
    pub recorded: u64,
    /// Computed intensities forwarded to a device target
    pub forwarded: u64,
    /// Unmatched datagrams forwarded to the default target
    pub passthrough: u64,
    /// Datagrams dropped as malformed or failing dispatch
    pub dropped: u64,
}

/// The OSC bridge: listen socket, router, and outbound sender
pub struct OscBridge {
    socket: UdpSocket,
    router: Mutex<Router>,
    sender: OscSender,
    default_target: SocketAddr,
    stats: ForwardStats,
}

impl OscBridge {
    /// Bind the listen socket and take ownership of the router
    pub fn bind(listen: SocketAddr, router: Router) -> io::Result<Self> {
        let socket = UdpSocket::bind(listen)?;
        let sender = OscSender::new()?;
        let default_target = router.default_target();
        Ok(Self {
            socket,
            router: Mutex::new(router),
            sender,
            default_target,
            stats: ForwardStats::default(),
        })
    }

    /// The bound listen address
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Counters since construction
    pub fn stats(&self) -> ForwardStats {
        self.stats
    }

    /// Receive and handle datagrams until the listen socket fails
    pub fn run(&mut self) -> io::Result<()> {
        info!("listening on {}", self.socket.local_addr()?);
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let (len, _peer) = self.socket.recv_from(&mut buf)?;
            self.handle_datagram(&buf[..len]);
        }
    }

    /// Handle one inbound datagram end to end
    pub fn handle_datagram(&mut self, datagram: &[u8]) {
        self.stats.received += 1;
        if self.stats.received % STATS_INTERVAL == 0 {
            debug!("{:?}", self.stats);
        }

        let message = match codec::decode(datagram) {
            Ok(message) => message,
            Err(e) => {
                self.stats.dropped += 1;
                warn!("dropping malformed datagram: {e}");
                return;
            }
        };

        // Bound addresses need a scalar payload; anything else that has a
        // route but no value is dropped, unbound traffic passes through.
        let value = message.last_value();

        let outcome = {
            let mut router = match self.router.lock() {
                Ok(router) => router,
                Err(poisoned) => poisoned.into_inner(),
            };
            match value {
                Some(value) => router.dispatch(&message.address, value),
                None if router.route(&message.address).is_none() => Ok(Dispatch::Passthrough),
                None => {
                    self.stats.dropped += 1;
                    warn!("{}: bound address without numeric payload", message.address);
                    return;
                }
            }
        };

        match outcome {
            Ok(Dispatch::Recorded) => {
                self.stats.recorded += 1;
            }
            Ok(Dispatch::Forward { target, value }) => {
                self.stats.forwarded += 1;
                debug!("{} -> {target} = {value}", message.address);
                self.sender.send(target, &message.address, value);
            }
            Ok(Dispatch::Passthrough) => {
                self.stats.passthrough += 1;
                self.sender.send_raw(self.default_target, datagram);
            }
            Err(e) => {
                self.stats.dropped += 1;
                error!("{}: dispatch failed: {e}", message.address);
            }
        }
    }
}
