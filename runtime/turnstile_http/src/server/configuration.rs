use std::num::NonZeroUsize;

use tracing_log_error::log_error;

/// The default number of connections that can wait in a worker's queue.
const DEFAULT_MAX_QUEUE_LENGTH: NonZeroUsize = NonZeroUsize::new(64).unwrap();

#[derive(Debug, Clone)]
/// All the available options for customizing the behaviour of a [`Server`](super::Server).
///
/// Refer to [`Server::set_config`](super::Server::set_config) for applying the configuration
/// you assembled.
pub struct ServerConfiguration {
    /// Number of worker threads to spawn.
    pub(crate) n_workers: NonZeroUsize,
    /// Number of accepted connections each worker can buffer before the acceptor
    /// moves on to the next worker.
    pub(crate) max_queue_length: NonZeroUsize,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerConfiguration {
    /// Initialize a new [`ServerConfiguration`] using its default settings.
    pub fn new() -> Self {
        let n_workers = match std::thread::available_parallelism() {
            Ok(n) => n,
            Err(e) => {
                let fallback = NonZeroUsize::MIN.saturating_add(1);
                log_error!(
                    e,
                    level: tracing::Level::WARN,
                    "Failed to determine the amount of available parallelism. \
                    Setting the number of worker threads to a fallback value of {}",
                    fallback);
                fallback
            }
        };
        Self {
            n_workers,
            max_queue_length: DEFAULT_MAX_QUEUE_LENGTH,
        }
    }

    /// Set the number of worker threads to be spawned.
    ///
    /// # Default
    ///
    /// It relies on [`std::thread::available_parallelism`].
    /// If the available parallelism cannot be determined, it defaults to 2.
    pub fn set_n_workers(mut self, n: NonZeroUsize) -> Self {
        self.n_workers = n;
        self
    }

    /// Get the number of worker threads to be spawned.
    pub fn get_n_workers(&self) -> NonZeroUsize {
        self.n_workers
    }

    /// Set how many accepted connections can be queued up for each worker.
    ///
    /// When every worker queue is full, new connections are dropped.
    pub fn set_max_queue_length(mut self, n: NonZeroUsize) -> Self {
        self.max_queue_length = n;
        self
    }

    /// Get how many accepted connections can be queued up for each worker.
    pub fn get_max_queue_length(&self) -> NonZeroUsize {
        self.max_queue_length
    }
}
