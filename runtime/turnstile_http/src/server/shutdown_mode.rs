use std::time::Duration;

#[derive(Debug, Clone)]
#[non_exhaustive]
/// Determine how a running [`Server`](super::Server) should shut down.
///
/// Use [`ServerHandle::shutdown`](super::ServerHandle::shutdown) to initiate the shutdown sequence.
pub enum ShutdownMode {
    /// Stop accepting new connections, then let each worker finish serving
    /// the requests that are already in flight.
    Graceful {
        /// Connections still open when the timeout expires are dropped.
        timeout: Duration,
    },
    /// Shut down immediately, dropping all open connections abruptly.
    Forced,
}

impl ShutdownMode {
    /// Returns `true` if you are asking for a graceful shutdown.
    pub fn is_graceful(&self) -> bool {
        matches!(self, Self::Graceful { .. })
    }

    /// Returns `true` if you are asking for a forced shutdown.
    pub fn is_forced(&self) -> bool {
        matches!(self, Self::Forced)
    }
}
