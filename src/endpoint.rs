//! # Connection Endpoints
//!
//! A [`ConnectionEndpoint`] is the probe's end of a stream socket together
//! with an explicit lifecycle state. Every operation checks the state before
//! it touches the socket:
//!
//! ```text
//!             connect()               shutdown_read()
//!  Unopened ─────────────▶ Connected ─────────────────▶ ShutdownRead
//!     │                        │                            │
//!     └──────── close() ───────┴────────── close() ─────────┴──▶ Closed
//!
//!  Invalid   (a descriptor that names no socket; every operation fails)
//! ```
//!
//! Reads are refused once the read side is shut down, even when the host
//! stack would still hand out bytes queued before the shutdown. Closing
//! drops the socket, so a closed endpoint can never reach the OS again.

use std::fmt;
use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::net::TcpStream;

/// Lifecycle state of a client endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketState {
    Unopened,
    Connected,
    ShutdownRead,
    Closed,
    /// Descriptor replaced by a value that names no socket.
    Invalid,
}

impl fmt::Display for SocketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unopened => "unopened",
            Self::Connected => "connected",
            Self::ShutdownRead => "shutdown-for-read",
            Self::Closed => "closed",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// One end of a stream socket, owned by the task that created it.
pub struct ConnectionEndpoint<S: TcpStream> {
    stream: Option<S>,
    state: SocketState,
    local: Option<SocketAddr>,
    remote: Option<SocketAddr>,
}

impl<S: TcpStream> fmt::Debug for ConnectionEndpoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionEndpoint")
            .field("state", &self.state)
            .field("local", &self.local)
            .field("remote", &self.remote)
            .finish()
    }
}

impl<S: TcpStream> Default for ConnectionEndpoint<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TcpStream> ConnectionEndpoint<S> {
    /// A fresh, unconnected endpoint.
    pub fn new() -> Self {
        Self {
            stream: None,
            state: SocketState::Unopened,
            local: None,
            remote: None,
        }
    }

    /// An endpoint whose descriptor names no socket.
    pub fn invalid() -> Self {
        Self {
            state: SocketState::Invalid,
            ..Self::new()
        }
    }

    pub fn state(&self) -> SocketState {
        self.state
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.remote
    }

    /// Connect an unopened endpoint to `addr`.
    pub async fn connect(&mut self, addr: SocketAddr) -> Result<()> {
        match self.state {
            SocketState::Unopened => {}
            SocketState::Connected | SocketState::ShutdownRead => {
                return Err(Error::AlreadyConnected)
            }
            SocketState::Closed => return Err(Error::Closed),
            SocketState::Invalid => return Err(Error::InvalidHandle),
        }

        let stream = S::connect(addr).await?;
        self.local = stream.local_addr().ok();
        self.remote = Some(stream.peer_addr().unwrap_or(addr));
        self.stream = Some(stream);
        self.state = SocketState::Connected;
        tracing::debug!(local = ?self.local, peer = %addr, "endpoint connected");
        Ok(())
    }

    /// Receive up to `buf.len()` bytes.
    ///
    /// Returns the number of bytes written to the front of `buf`; `0` means
    /// the peer closed its side.
    pub async fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.readable()?;
        let n = stream.read(buf).await?;
        tracing::trace!(bytes = n, "endpoint received");
        Ok(n)
    }

    /// Shut down the read side; later receives fail.
    pub fn shutdown_read(&mut self) -> Result<()> {
        let stream = self.readable()?;
        stream.shutdown_read()?;
        self.state = SocketState::ShutdownRead;
        tracing::debug!(peer = ?self.remote, "endpoint read side shut down");
        Ok(())
    }

    /// Release the socket. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!(peer = ?self.remote, "endpoint closed");
        }
        self.state = SocketState::Closed;
    }

    fn readable(&mut self) -> Result<&mut S> {
        match self.state {
            SocketState::Connected => self.stream.as_mut().ok_or(Error::Closed),
            SocketState::ShutdownRead => Err(Error::ReadShutdown),
            SocketState::Closed => Err(Error::Closed),
            SocketState::Unopened => Err(Error::NotConnected),
            SocketState::Invalid => Err(Error::InvalidHandle),
        }
    }
}
