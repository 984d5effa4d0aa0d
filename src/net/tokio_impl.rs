//! Tokio socket implementations.

use super::{BindError, TcpListener, TcpStream};
use crate::SetupStep;
use std::io;
use std::net::{Shutdown, SocketAddr};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

impl TcpStream for tokio::net::TcpStream {
    type Listener = tokio::net::TcpListener;

    async fn connect(addr: SocketAddr) -> io::Result<Self> {
        tokio::net::TcpStream::connect(addr).await
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AsyncReadExt::read(self, buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        AsyncWriteExt::write_all(self, buf).await
    }

    fn shutdown_read(&self) -> io::Result<()> {
        // tokio only exposes write shutdown; go through socket2 for the read half.
        socket2::SockRef::from(self).shutdown(Shutdown::Read)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        tokio::net::TcpStream::local_addr(self)
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        tokio::net::TcpStream::peer_addr(self)
    }
}

impl TcpListener for tokio::net::TcpListener {
    type Stream = tokio::net::TcpStream;

    async fn bind(addr: SocketAddr, backlog: u32) -> Result<Self, BindError> {
        // TcpListener::bind hardcodes the backlog, so build the socket by hand.
        let socket = match addr {
            SocketAddr::V4(_) => tokio::net::TcpSocket::new_v4(),
            SocketAddr::V6(_) => tokio::net::TcpSocket::new_v6(),
        }
        .map_err(BindError::at(SetupStep::Socket))?;

        socket
            .set_reuseaddr(true)
            .map_err(BindError::at(SetupStep::Socket))?;
        socket.bind(addr).map_err(BindError::at(SetupStep::Bind))?;
        socket
            .listen(backlog)
            .map_err(BindError::at(SetupStep::Listen))
    }

    async fn accept(&self) -> io::Result<(Self::Stream, SocketAddr)> {
        tokio::net::TcpListener::accept(self).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        tokio::net::TcpListener::local_addr(self)
    }
}
