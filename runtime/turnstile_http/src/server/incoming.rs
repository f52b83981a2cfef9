use std::net::SocketAddr;

use socket2::Domain;
use tokio::net::{TcpListener, TcpStream};

/// A stream of incoming TCP connections.
///
/// [`IncomingStream::bind`] is the primary entrypoint for constructing a new [`IncomingStream`].
/// Incoming connections are usually handed over to a [`Server`](super::Server) via
/// [`Server::listen`](super::Server::listen).
#[derive(Debug)]
pub struct IncomingStream {
    listener: TcpListener,
}

impl IncomingStream {
    /// Create a new [`IncomingStream`] by binding to a socket address.
    ///
    /// The socket is non-blocking, reuses the address and has a backlog of 1024 connections.
    pub async fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let socket = socket2::Socket::new(
            Domain::for_address(addr),
            socket2::Type::STREAM,
            Some(socket2::Protocol::TCP),
        )?;

        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(1024_i32)?;

        let listener = std::net::TcpListener::from(socket);
        Ok(Self {
            listener: TcpListener::from_std(listener)?,
        })
    }

    /// Returns the address that this [`IncomingStream`] is bound to.
    ///
    /// It differs from the requested one when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Wait for the next TCP connection and return it alongside the peer address.
    pub async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        self.listener.accept().await
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::IncomingStream;

    #[tokio::test]
    async fn binding_to_port_zero_picks_a_free_port() {
        let incoming = IncomingStream::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = incoming.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn accept_yields_the_peer_address() {
        let incoming = IncomingStream::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = incoming.local_addr().unwrap();

        let client = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (_stream, peer) = incoming.accept().await.unwrap();
        assert_eq!(peer, client.local_addr().unwrap());
    }
}
