use std::future::{Future, IntoFuture, poll_fn};
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::Poll;
use std::thread;

use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::{JoinError, JoinSet, LocalSet};
use tracing_log_error::log_error;

use super::server_::Handler;
use super::worker::{Worker, WorkerHandle};
use super::{IncomingStream, ServerConfiguration, ShutdownMode};

/// A handle to a running [`Server`](super::Server).
///
/// `.await` it to wait for the server to shut down, or call [`ServerHandle::shutdown`]
/// to stop it.
#[derive(Clone, Debug)]
pub struct ServerHandle {
    command_outbox: tokio::sync::mpsc::Sender<ServerCommand>,
}

impl ServerHandle {
    pub(super) fn new<HandlerFuture, ApplicationState>(
        config: ServerConfiguration,
        incoming: Vec<IncomingStream>,
        handler: Handler<HandlerFuture, ApplicationState>,
        application_state: ApplicationState,
    ) -> std::io::Result<Self>
    where
        HandlerFuture: Future<Output = crate::response::Response> + 'static,
        ApplicationState: Clone + Send + Sync + 'static,
    {
        let (command_outbox, command_inbox) = tokio::sync::mpsc::channel(32);
        let acceptor = Acceptor::new(config, incoming, handler, application_state, command_inbox)?;
        let _ = acceptor.spawn()?;
        Ok(Self { command_outbox })
    }

    /// Instruct the [`Server`](super::Server) to stop accepting new connections.
    ///
    /// It resolves once every worker is done, according to the chosen [`ShutdownMode`].
    #[doc(alias("stop"))]
    pub async fn shutdown(self, mode: ShutdownMode) {
        let (completion_notifier, completion) = tokio::sync::oneshot::channel();
        if self
            .command_outbox
            .send(ServerCommand::Shutdown {
                completion_notifier,
                mode,
            })
            .await
            .is_ok()
        {
            // Sending only fails if the acceptor thread is already gone.
            let _ = completion.await;
        }
    }
}

impl IntoFuture for ServerHandle {
    type Output = ();
    type IntoFuture = Pin<Box<dyn Future<Output = ()> + Send + Sync + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.command_outbox.closed().await })
    }
}

#[derive(Debug)]
enum ServerCommand {
    Shutdown {
        completion_notifier: tokio::sync::oneshot::Sender<()>,
        mode: ShutdownMode,
    },
}

#[must_use]
struct Acceptor<HandlerFuture, ApplicationState> {
    command_inbox: tokio::sync::mpsc::Receiver<ServerCommand>,
    incoming: Vec<IncomingStream>,
    worker_handles: Vec<WorkerHandle>,
    max_queue_length: usize,
    handler: Handler<HandlerFuture, ApplicationState>,
    application_state: ApplicationState,
    // `fn() -> HandlerFuture` keeps `Acceptor` `Send` and `Sync`,
    // which `PhantomData<HandlerFuture>` wouldn't.
    handler_output_future: PhantomData<fn() -> HandlerFuture>,
}

type AcceptedConnection = (IncomingStream, TcpStream, SocketAddr);

enum AcceptorInboxMessage {
    ServerCommand(ServerCommand),
    Connection(Option<Result<AcceptedConnection, JoinError>>),
}

impl<HandlerFuture, ApplicationState> Acceptor<HandlerFuture, ApplicationState>
where
    HandlerFuture: Future<Output = crate::response::Response> + 'static,
    ApplicationState: Clone + Send + Sync + 'static,
{
    fn new(
        config: ServerConfiguration,
        incoming: Vec<IncomingStream>,
        handler: Handler<HandlerFuture, ApplicationState>,
        application_state: ApplicationState,
        command_inbox: tokio::sync::mpsc::Receiver<ServerCommand>,
    ) -> std::io::Result<Self> {
        let max_queue_length = config.max_queue_length.get();
        let n_workers = config.n_workers.get();
        let mut worker_handles = Vec::with_capacity(n_workers);
        for i in 0..n_workers {
            let (worker, handle) =
                Worker::new(i, max_queue_length, handler, application_state.clone());
            worker_handles.push(handle);
            worker.spawn()?;
        }
        Ok(Self {
            command_inbox,
            incoming,
            worker_handles,
            max_queue_length,
            handler,
            handler_output_future: PhantomData,
            application_state,
        })
    }

    /// Accept incoming connections and dispatch them to workers.
    ///
    /// Constraint: this method **must not panic**.
    async fn run(self) {
        /// Accept a connection from the given [`IncomingStream`].
        /// Failures are logged and we keep trying with the next connection.
        async fn accept_connection(incoming: IncomingStream) -> AcceptedConnection {
            loop {
                match incoming.accept().await {
                    Ok((connection, remote_peer)) => return (incoming, connection, remote_peer),
                    Err(e) => {
                        log_error!(e, "Failed to accept connection");
                        continue;
                    }
                }
            }
        }

        let Self {
            mut command_inbox,
            mut worker_handles,
            incoming,
            max_queue_length,
            handler,
            application_state,
            handler_output_future: _,
        } = self;

        let n_workers = worker_handles.len();
        let mut next_worker = 0;

        let mut incoming_join_set = JoinSet::new();
        for incoming in incoming.into_iter() {
            incoming_join_set.spawn_local(accept_connection(incoming));
        }

        let error = 'event_loop: loop {
            let message =
                poll_fn(|cx| Self::poll_inboxes(cx, &mut command_inbox, &mut incoming_join_set))
                    .await;
            match message {
                AcceptorInboxMessage::ServerCommand(ServerCommand::Shutdown {
                    completion_notifier,
                    mode,
                }) => {
                    Self::shutdown(completion_notifier, mode, incoming_join_set, worker_handles)
                        .await;
                    return;
                }
                AcceptorInboxMessage::Connection(msg) => {
                    let (incoming, connection, remote_peer) = match msg {
                        Some(Ok(accepted)) => accepted,
                        // Only happens if an accept task panicked or was cancelled.
                        Some(Err(e)) => break 'event_loop e,
                        None => {
                            // Every successful accept re-spawns a task for the same socket,
                            // so the set can't be empty while we're running.
                            tracing::error!(
                                "The acceptor has no sockets left to listen on. It will exit now."
                            );
                            return;
                        }
                    };
                    incoming_join_set.spawn_local(accept_connection(incoming));

                    let mut accepted = (connection, remote_peer);
                    let mut has_been_handled = false;
                    // Round-robin: if a worker's queue is full, move on to the next one
                    // until we've tried them all.
                    for _ in 0..n_workers {
                        let mut has_crashed: Option<usize> = None;
                        let worker_handle = &worker_handles[next_worker];
                        match worker_handle.dispatch(accepted) {
                            Ok(()) => {
                                has_been_handled = true;
                                next_worker = (next_worker + 1) % n_workers;
                                break;
                            }
                            Err(TrySendError::Full(conn)) => accepted = conn,
                            // The worker thread is no longer running.
                            Err(TrySendError::Closed(conn)) => {
                                has_crashed = Some(worker_handle.id());
                                accepted = conn;
                            }
                        }
                        next_worker = (next_worker + 1) % n_workers;

                        if let Some(worker_id) = has_crashed {
                            tracing::warn!(worker_id = worker_id, "Worker crashed, restarting it");
                            let (worker, worker_handle) = Worker::new(
                                worker_id,
                                max_queue_length,
                                handler,
                                application_state.clone(),
                            );
                            match worker.spawn() {
                                Ok(_) => worker_handles[worker_id] = worker_handle,
                                Err(e) => {
                                    log_error!(e, worker_id = worker_id, "Failed to restart worker")
                                }
                            }
                        }
                    }

                    if !has_been_handled {
                        tracing::error!(
                            remote_peer = %remote_peer,
                            "All workers are busy, dropping connection",
                        );
                    }
                }
            }
        };

        log_error!(
            error,
            "Failed to accept new connections. The acceptor thread will exit now."
        );
    }

    /// Check if there is work to be done.
    fn poll_inboxes(
        cx: &mut std::task::Context<'_>,
        server_command_inbox: &mut tokio::sync::mpsc::Receiver<ServerCommand>,
        incoming_join_set: &mut JoinSet<AcceptedConnection>,
    ) -> Poll<AcceptorInboxMessage> {
        // Shutdown commands take priority over incoming connections.
        if let Poll::Ready(Some(message)) = server_command_inbox.poll_recv(cx) {
            return Poll::Ready(AcceptorInboxMessage::ServerCommand(message));
        }
        if let Poll::Ready(message) = incoming_join_set.poll_join_next(cx) {
            return Poll::Ready(AcceptorInboxMessage::Connection(message));
        }
        Poll::Pending
    }

    fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        thread::Builder::new()
            .name("turnstile-acceptor".to_string())
            .spawn(move || {
                LocalSet::new().block_on(&runtime, self.run());
            })
    }

    async fn shutdown(
        completion_notifier: tokio::sync::oneshot::Sender<()>,
        mode: ShutdownMode,
        incoming_join_set: JoinSet<AcceptedConnection>,
        worker_handles: Vec<WorkerHandle>,
    ) {
        // Cancelling the accept tasks drops the listeners, closing their sockets.
        drop(incoming_join_set);

        let mut shutdown_join_set = JoinSet::new();
        for worker_handle in worker_handles {
            let future = worker_handle.shutdown(mode.clone());
            if mode.is_graceful() {
                shutdown_join_set.spawn_local(future);
            }
        }

        if let ShutdownMode::Graceful { timeout } = mode {
            // Each worker enforces the timeout on its own connections.
            // This is a backstop in case a worker is unresponsive.
            let _ = tokio::time::timeout(timeout, async move {
                while shutdown_join_set.join_next().await.is_some() {}
            })
            .await;
        }

        let _ = completion_notifier.send(());
    }
}
