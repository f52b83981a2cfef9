//! Discover the address this host is reachable at.
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};

/// A public address used to pick the outbound interface.
///
/// UDP `connect` only selects a route: no packet is ever sent.
const OUTBOUND_TARGET: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

#[derive(Debug, thiserror::Error)]
pub enum LocalAddressError {
    #[error("Failed to look up the outbound network interface")]
    Socket(#[from] std::io::Error),
    #[error("The outbound network interface has no usable IPv4 address, got `{0}`")]
    Unusable(IpAddr),
}

/// The IPv4 address of the interface the host uses for outbound traffic.
///
/// Loopback and non-IPv4 addresses are rejected.
pub fn local_ipv4() -> Result<Ipv4Addr, LocalAddressError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.connect(&OUTBOUND_TARGET.into())?;
    let local = socket
        .local_addr()?
        .as_socket()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    usable_ipv4(local)
}

fn usable_ipv4(ip: IpAddr) -> Result<Ipv4Addr, LocalAddressError> {
    match ip {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Ok(v4),
        other => Err(LocalAddressError::Unusable(other)),
    }
}

/// Like [`local_ipv4`], but a failure is logged and turned into `None`.
pub fn discover_served_from() -> Option<Ipv4Addr> {
    match local_ipv4() {
        Ok(ip) => Some(ip),
        Err(e) => {
            tracing_log_error::log_error!(
                e,
                level: tracing::Level::WARN,
                "Failed to determine the local IPv4 address, are you connected to the network?"
            );
            None
        }
    }
}
