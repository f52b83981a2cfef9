use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::thread;

use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tracing_log_error::log_error;

use crate::connection::ConnectionInfo;
use crate::response::ResponseBody;

use super::ShutdownMode;
use super::server_::Handler;

/// A connection accepted by the acceptor, waiting to be served by a worker.
pub(super) type Accepted = (TcpStream, SocketAddr);

/// A request to stop serving, sent by the acceptor.
pub(super) struct ShutdownCommand {
    mode: ShutdownMode,
    completion_notifier: tokio::sync::oneshot::Sender<()>,
}

/// A handle to dispatch incoming connections to a worker thread.
pub(super) struct WorkerHandle {
    connection_outbox: tokio::sync::mpsc::Sender<Accepted>,
    // A separate channel, so that shutdown is never stuck behind a full connection queue.
    command_outbox: tokio::sync::mpsc::Sender<ShutdownCommand>,
    id: usize,
}

impl WorkerHandle {
    /// Dispatch a connection to the worker thread without waiting.
    pub(super) fn dispatch(&self, connection: Accepted) -> Result<(), TrySendError<Accepted>> {
        self.connection_outbox.try_send(connection)
    }

    /// Get the worker's ID.
    pub(super) fn id(&self) -> usize {
        self.id
    }

    /// Ask the worker to shut down.
    ///
    /// The command is enqueued before the returned future is polled for the first time.
    /// The future resolves once the worker is done.
    pub(super) fn shutdown(self, mode: ShutdownMode) -> impl Future<Output = ()> + 'static {
        let (completion_notifier, completion) = tokio::sync::oneshot::channel();
        let sent = self
            .command_outbox
            .try_send(ShutdownCommand {
                mode,
                completion_notifier,
            })
            .is_ok();
        async move {
            // If we can't reach the worker, it has already stopped.
            if sent {
                let _ = completion.await;
            }
        }
    }
}

#[must_use]
/// A worker thread that serves the connections it receives from the acceptor.
pub(super) struct Worker<HandlerFuture, ApplicationState> {
    connection_inbox: tokio::sync::mpsc::Receiver<Accepted>,
    command_inbox: tokio::sync::mpsc::Receiver<ShutdownCommand>,
    handler: Handler<HandlerFuture, ApplicationState>,
    application_state: ApplicationState,
    id: usize,
}

impl<HandlerFuture, ApplicationState> Worker<HandlerFuture, ApplicationState>
where
    HandlerFuture: Future<Output = crate::response::Response> + 'static,
    ApplicationState: Clone + Send + Sync + 'static,
{
    /// Configure a new worker without spawning it.
    ///
    /// `max_queue_length` is the maximum number of connections that can be queued up for this
    /// worker.
    pub(super) fn new(
        id: usize,
        max_queue_length: usize,
        handler: Handler<HandlerFuture, ApplicationState>,
        application_state: ApplicationState,
    ) -> (Self, WorkerHandle) {
        let (connection_outbox, connection_inbox) = tokio::sync::mpsc::channel(max_queue_length);
        let (command_outbox, command_inbox) = tokio::sync::mpsc::channel(1);
        let worker = Self {
            connection_inbox,
            command_inbox,
            handler,
            application_state,
            id,
        };
        let handle = WorkerHandle {
            connection_outbox,
            command_outbox,
            id,
        };
        (worker, handle)
    }

    /// Serve incoming connections until a shutdown command arrives
    /// or the acceptor goes away.
    async fn run(self) {
        let Self {
            mut connection_inbox,
            mut command_inbox,
            handler,
            application_state,
            id,
        } = self;
        let builder = hyper_util::server::conn::auto::Builder::new(LocalExec);
        let in_flight = GracefulShutdown::new();

        let command = loop {
            tokio::select! {
                biased;
                command = command_inbox.recv() => break command,
                accepted = connection_inbox.recv() => {
                    let Some((stream, peer_addr)) = accepted else {
                        break None;
                    };
                    let connection_info = ConnectionInfo::new(peer_addr);
                    let state = application_state.clone();
                    let service = hyper::service::service_fn(move |request| {
                        let response = handler(request, connection_info.clone(), state.clone());
                        async move {
                            let response: http::Response<ResponseBody> = response.await.into();
                            Ok::<_, Infallible>(response)
                        }
                    });
                    let connection = builder
                        .serve_connection(TokioIo::new(stream), service)
                        .into_owned();
                    let connection = in_flight.watch(connection);
                    tokio::task::spawn_local(async move {
                        if let Err(e) = connection.await {
                            log_error!(
                                *e,
                                level: tracing::Level::DEBUG,
                                peer_addr = %peer_addr,
                                "Failed to serve connection"
                            );
                        }
                    });
                }
            }
        };

        // Stop receiving new connections, dropping the ones still waiting in the queue.
        drop(connection_inbox);
        let Some(ShutdownCommand {
            mode,
            completion_notifier,
        }) = command
        else {
            tracing::info!(worker_id = id, "Worker finished");
            return;
        };
        if let ShutdownMode::Graceful { timeout } = mode {
            if tokio::time::timeout(timeout, in_flight.shutdown())
                .await
                .is_err()
            {
                tracing::warn!(
                    worker_id = id,
                    "Some connections were still open when the shutdown timeout expired"
                );
            }
        }
        tracing::info!(worker_id = id, "Worker shut down");
        let _ = completion_notifier.send(());
    }

    /// Spawn a thread and run the worker there, using a single-threaded executor that can
    /// handle !Send futures.
    pub(super) fn spawn(self) -> Result<thread::JoinHandle<()>, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        thread::Builder::new()
            .name(format!("turnstile-worker-{}", self.id))
            .spawn(move || {
                // Use a `LocalSet` to allow the worker to spawn !Send futures.
                let local = tokio::task::LocalSet::new();
                local.block_on(&runtime, self.run());
            })
    }
}

/// `hyper` needs an executor to spawn HTTP/2 stream tasks.
///
/// We use `spawn_local` since we want each worker thread to be able to spawn !Send futures.
#[derive(Clone, Copy, Debug)]
struct LocalExec;

impl<F> hyper::rt::Executor<F> for LocalExec
where
    F: std::future::Future + 'static, // no `Send`
{
    fn execute(&self, fut: F) {
        // This will spawn into the currently running `LocalSet`.
        tokio::task::spawn_local(fut);
    }
}
