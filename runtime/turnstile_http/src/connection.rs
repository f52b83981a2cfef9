//! Information about the underlying HTTP connection.
use std::net::SocketAddr;

/// Information about the TCP connection a request was received on.
///
/// The [`Server`](crate::server::Server) builds one per accepted connection
/// and hands a copy to the handler for each request served on it.
#[derive(Clone, Debug)]
pub struct ConnectionInfo {
    pub(crate) peer_addr: SocketAddr,
}

impl ConnectionInfo {
    /// Build a new [`ConnectionInfo`] for a client connected from `peer_addr`.
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self { peer_addr }
    }

    /// The address of the client, as seen by the server.
    ///
    /// Behind a proxy or a load balancer, this is the address of the proxy.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
