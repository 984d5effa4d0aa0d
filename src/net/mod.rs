//! Network abstraction traits for async socket operations.
//!
//! The listener and the probe are generic over these traits so they run on
//! real tokio sockets and, with the `turmoil` feature, on simulated turmoil
//! sockets.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

mod tokio_impl;

#[cfg(feature = "turmoil")]
mod turmoil_impl;

/// Async TCP stream abstraction.
///
/// Implemented by `tokio::net::TcpStream` and `turmoil::net::TcpStream`.
pub trait TcpStream: Send + Sized + 'static {
    /// The listener type that produces this stream.
    type Listener: TcpListener<Stream = Self>;

    /// Connect to the given address.
    fn connect(addr: SocketAddr) -> impl Future<Output = io::Result<Self>> + Send;

    /// Read data into the buffer.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Write all data from the buffer.
    fn write_all(&mut self, buf: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Shut down the read half of the connection.
    fn shutdown_read(&self) -> io::Result<()>;

    /// Get the local address.
    fn local_addr(&self) -> io::Result<SocketAddr>;

    /// Get the peer address.
    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

/// Async TCP listener abstraction.
///
/// Implemented by `tokio::net::TcpListener` and `turmoil::net::TcpListener`.
pub trait TcpListener: Send + Sync + Sized + 'static {
    /// The stream type produced when accepting connections.
    type Stream: TcpStream<Listener = Self>;

    /// Bind to the given address and start listening.
    ///
    /// `backlog` bounds the queue of connections not yet accepted.
    fn bind(addr: SocketAddr, backlog: u32) -> impl Future<Output = Result<Self, BindError>> + Send;

    /// Accept a new connection.
    fn accept(&self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;

    /// Get the local address.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// Failure of one of the calls that bring a listening socket up.
#[derive(Debug)]
pub struct BindError {
    pub step: crate::SetupStep,
    pub source: io::Error,
}

impl BindError {
    pub(crate) fn at(step: crate::SetupStep) -> impl FnOnce(io::Error) -> Self {
        move |source| Self { step, source }
    }
}

impl From<BindError> for crate::Error {
    fn from(e: BindError) -> Self {
        Self::Setup {
            step: e.step,
            source: e.source,
        }
    }
}
