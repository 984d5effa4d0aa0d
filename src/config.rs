//! # Harness Configuration
//!
//! The defaults reproduce the classic receive check: a listener on
//! `127.0.0.1:1109` with a backlog of 2, sending `"Hello World !\n"` six
//! times, and a probe receiving into a 20-byte buffer.
//!
//! ```
//! use loopback_recv::HarnessConfig;
//!
//! let config = HarnessConfig::default();
//! assert_eq!(config.bind_addr.port(), 1109);
//! assert_eq!(config.recv_capacity, 20);
//! ```
//!
//! ## Builder Pattern
//!
//! Tests running several harnesses at once pick distinct ports:
//!
//! ```
//! use loopback_recv::HarnessConfig;
//! use std::time::Duration;
//!
//! let config = HarnessConfig::builder()
//!     .port(41109)
//!     .startup_timeout(Duration::from_secs(5))
//!     .build();
//! assert_eq!(config.peer_addr.port(), 41109);
//! ```
//!
//! ## Configuration Options Reference
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `bind_addr` | `127.0.0.1:1109` | Address the listener binds to |
//! | `peer_addr` | `127.0.0.1:1109` | Address the probe connects to |
//! | `backlog` | 2 | Pending-connection queue of the listener |
//! | `recv_capacity` | 20 | Receive buffer size of the probe |
//! | `message` | `"Hello World !\n"` | Payload the listener transmits |
//! | `repeat` | 6 | How many times the payload is transmitted |
//! | `startup_timeout` | None | Bound on the probe's wait for the listener |
//!
//! `bind_addr` and `peer_addr` only differ when the listener must bind a
//! wildcard address, as in simulated networks where the probe reaches the
//! listener through its host address.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use bytes::Bytes;

use crate::error::{ConfigError, Result};

/// Fixed loopback port of the receive check.
pub const DEFAULT_PORT: u16 = 1109;

/// Listen backlog of the listener.
pub const DEFAULT_BACKLOG: u32 = 2;

/// Receive buffer capacity of the probe, in bytes.
pub const DEFAULT_RECV_CAPACITY: usize = 20;

/// Payload the listener transmits.
pub const DEFAULT_MESSAGE: &str = "Hello World !\n";

/// Number of times the listener transmits [`DEFAULT_MESSAGE`].
pub const DEFAULT_REPEAT: usize = 6;

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Address the listener binds to (default: 127.0.0.1:1109)
    pub bind_addr: SocketAddr,
    /// Address the probe connects to (default: 127.0.0.1:1109)
    pub peer_addr: SocketAddr,
    /// Listen backlog (default: 2)
    pub backlog: u32,
    /// Receive buffer capacity in bytes (default: 20)
    pub recv_capacity: usize,
    /// Payload sent by the listener (default: "Hello World !\n")
    pub message: Bytes,
    /// How many times the payload is sent (default: 6)
    pub repeat: usize,
    /// Upper bound on the probe's startup wait (default: None)
    ///
    /// `None` keeps the unbounded wait: a listener that never starts
    /// listening leaves the probe suspended forever.
    pub startup_timeout: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let loopback = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT));
        Self {
            bind_addr: loopback,
            peer_addr: loopback,
            backlog: DEFAULT_BACKLOG,
            recv_capacity: DEFAULT_RECV_CAPACITY,
            message: Bytes::from_static(DEFAULT_MESSAGE.as_bytes()),
            repeat: DEFAULT_REPEAT,
            startup_timeout: None,
        }
    }
}

impl HarnessConfig {
    /// Create a builder for `HarnessConfig`.
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    /// Reject configurations the listener or probe cannot run with.
    ///
    /// Called by the harness before any socket is created.
    pub fn validate(&self) -> Result<()> {
        if self.recv_capacity == 0 {
            return Err(ConfigError::new("recv_capacity must be at least 1 byte").into());
        }
        if self.repeat == 0 {
            return Err(ConfigError::new("repeat must be at least 1").into());
        }
        if self.message.is_empty() {
            return Err(ConfigError::new("message must not be empty").into());
        }
        if self.backlog == 0 {
            return Err(ConfigError::new("backlog must be at least 1").into());
        }
        Ok(())
    }
}

/// Builder for `HarnessConfig`
#[derive(Default)]
#[must_use]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Address the listener binds to.
    ///
    /// Default: `127.0.0.1:1109`
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Address the probe connects to.
    ///
    /// Default: `127.0.0.1:1109`
    pub fn peer_addr(mut self, addr: SocketAddr) -> Self {
        self.config.peer_addr = addr;
        self
    }

    /// Set the port of both the bind and the peer address.
    pub fn port(mut self, port: u16) -> Self {
        self.config.bind_addr.set_port(port);
        self.config.peer_addr.set_port(port);
        self
    }

    /// Listen backlog.
    ///
    /// Default: 2
    pub fn backlog(mut self, backlog: u32) -> Self {
        self.config.backlog = backlog;
        self
    }

    /// Receive buffer capacity of the probe.
    ///
    /// Default: 20 bytes
    pub fn recv_capacity(mut self, capacity: usize) -> Self {
        self.config.recv_capacity = capacity;
        self
    }

    /// Payload the listener transmits.
    ///
    /// Default: `"Hello World !\n"`
    pub fn message(mut self, message: impl Into<Bytes>) -> Self {
        self.config.message = message.into();
        self
    }

    /// How many times the listener transmits the payload.
    ///
    /// Default: 6
    pub fn repeat(mut self, repeat: usize) -> Self {
        self.config.repeat = repeat;
        self
    }

    /// Bound the probe's wait on the startup gate.
    ///
    /// Default: unbounded
    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.config.startup_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> HarnessConfig {
        self.config
    }
}
