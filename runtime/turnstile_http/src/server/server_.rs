use std::future::Future;

use crate::connection::ConnectionInfo;

use super::{IncomingStream, ServerConfiguration, ServerHandle};

/// The signature of the function invoked for every incoming request.
pub(super) type Handler<HandlerFuture, ApplicationState> =
    fn(http::Request<hyper::body::Incoming>, ConnectionInfo, ApplicationState) -> HandlerFuture;

/// An HTTP server to handle incoming connections.
///
/// # Overview
///
/// 1. Create a new [`Server`] with [`Server::new`].
/// 2. Tweak it with [`Server::set_config`] if the defaults don't suit you.
/// 3. Provide one or more [`IncomingStream`]s via [`Server::listen`].
/// 4. Start serving with [`Server::serve`], which returns a [`ServerHandle`].
///
/// # Architecture
///
/// A dedicated thread accepts incoming connections and dispatches them to a pool
/// of worker threads. Each worker runs a single-threaded `tokio` runtime, so request
/// handlers don't need to be `Send`.
#[must_use = "You must call `serve` on a `Server` to start listening for incoming connections"]
pub struct Server {
    config: ServerConfiguration,
    incoming: Vec<IncomingStream>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    /// Create a new [`Server`] with default configuration and no addresses to listen on.
    pub fn new() -> Self {
        Self {
            config: ServerConfiguration::default(),
            incoming: Vec::new(),
        }
    }

    /// Replace the configuration of this [`Server`].
    pub fn set_config(mut self, config: ServerConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Get a reference to the [`ServerConfiguration`] for this [`Server`].
    pub fn get_config(&self) -> &ServerConfiguration {
        &self.config
    }

    /// Ask the server to process connections from an [`IncomingStream`].
    ///
    /// Call this method multiple times to listen on several addresses.
    /// Bind the stream yourself when you need to know its address before the server
    /// starts, e.g. when binding to port 0 in tests.
    pub fn listen(mut self, incoming: IncomingStream) -> Self {
        self.incoming.push(incoming);
        self
    }

    /// Start listening for incoming connections.
    ///
    /// `handler` is invoked for every incoming request, alongside information about the
    /// connection and a clone of `application_state`.
    ///
    /// It fails if the acceptor or any worker thread cannot be started.
    ///
    /// # Panics
    ///
    /// It panics if no [`IncomingStream`] has been provided via [`Server::listen`].
    pub fn serve<HandlerFuture, ApplicationState>(
        self,
        handler: fn(
            http::Request<hyper::body::Incoming>,
            ConnectionInfo,
            ApplicationState,
        ) -> HandlerFuture,
        application_state: ApplicationState,
    ) -> std::io::Result<ServerHandle>
    where
        HandlerFuture: Future<Output = crate::response::Response> + 'static,
        ApplicationState: Clone + Send + Sync + 'static,
    {
        assert!(
            !self.incoming.is_empty(),
            "Cannot serve: no incoming stream was provided via `Server::listen`"
        );
        ServerHandle::new(self.config, self.incoming, handler, application_state)
    }
}
