//! Turmoil socket implementations for testing.
//! Enabled with the `turmoil` feature.

use super::{BindError, TcpListener, TcpStream};
use crate::SetupStep;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

impl TcpStream for turmoil::net::TcpStream {
    type Listener = turmoil::net::TcpListener;

    async fn connect(addr: SocketAddr) -> io::Result<Self> {
        Self::connect(addr).await
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AsyncReadExt::read(self, buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        AsyncWriteExt::write_all(self, buf).await
    }

    fn shutdown_read(&self) -> io::Result<()> {
        // The simulated stack has no read-half shutdown. The endpoint state
        // machine stops reading after this call.
        Ok(())
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Self::local_addr(self)
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        Self::peer_addr(self)
    }
}

impl TcpListener for turmoil::net::TcpListener {
    type Stream = turmoil::net::TcpStream;

    async fn bind(addr: SocketAddr, _backlog: u32) -> Result<Self, BindError> {
        Self::bind(addr).await.map_err(BindError::at(SetupStep::Bind))
    }

    async fn accept(&self) -> io::Result<(Self::Stream, SocketAddr)> {
        Self::accept(self).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Self::local_addr(self)
    }
}
