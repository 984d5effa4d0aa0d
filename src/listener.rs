//! # Listener
//!
//! The server side of the receive check. One run:
//!
//! 1. bind the configured address and listen with the configured backlog
//! 2. signal the [`StartupGate`]
//! 3. accept exactly one connection (no timeout)
//! 4. transmit the configured message `repeat` times
//! 5. close the accepted connection, then the listening socket
//!
//! The gate is signaled before `accept` is reached. A probe that connects in
//! between is queued by the listen backlog.
//!
//! Setup failures end the run before the gate is signaled. A failed send is
//! logged and stops transmission; the peer may legitimately have gone away.

use std::marker::PhantomData;
use std::net::SocketAddr;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::gate::StartupGate;
use crate::net::{TcpListener, TcpStream};

/// What a completed listener run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerStats {
    /// Address the listener was bound to.
    pub local: SocketAddr,
    /// Address of the accepted peer.
    pub peer: SocketAddr,
    pub messages_sent: usize,
    pub bytes_sent: usize,
}

/// Server role of the receive check.
pub struct Listener<L: TcpListener = tokio::net::TcpListener> {
    config: HarnessConfig,
    gate: StartupGate,
    _phantom: PhantomData<fn() -> L>,
}

impl<L: TcpListener> Listener<L> {
    pub fn new(config: HarnessConfig, gate: StartupGate) -> Self {
        Self {
            config,
            gate,
            _phantom: PhantomData,
        }
    }

    pub async fn run(self) -> Result<ListenerStats> {
        let listener = L::bind(self.config.bind_addr, self.config.backlog).await?;
        let local = listener.local_addr().unwrap_or(self.config.bind_addr);
        tracing::info!(addr = %local, backlog = self.config.backlog, "listening");

        self.gate.signal();

        let (mut conn, peer) = listener.accept().await?;
        tracing::info!(%peer, "accepted connection");

        let mut stats = ListenerStats {
            local,
            peer,
            messages_sent: 0,
            bytes_sent: 0,
        };
        for _ in 0..self.config.repeat {
            if let Err(e) = conn.write_all(&self.config.message).await {
                tracing::warn!(%peer, sent = stats.messages_sent, "send failed: {e}");
                break;
            }
            stats.messages_sent += 1;
            stats.bytes_sent += self.config.message.len();
        }
        tracing::debug!(
            %peer,
            messages = stats.messages_sent,
            bytes = stats.bytes_sent,
            "transmission done"
        );

        drop(conn);
        drop(listener);
        tracing::info!(addr = %local, "listener closed");
        Ok(stats)
    }
}
