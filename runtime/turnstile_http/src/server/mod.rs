//! An HTTP server with one single-threaded runtime per worker thread.
//!
//! A dedicated acceptor thread accepts connections and hands them out round-robin
//! to the workers. Handlers are therefore free to produce `!Send` futures.
pub use configuration::ServerConfiguration;
pub use incoming::IncomingStream;
pub use server_::Server;
pub use server_handle::ServerHandle;
pub use shutdown_mode::ShutdownMode;

mod configuration;
mod incoming;
mod server_;
mod server_handle;
mod shutdown_mode;
mod worker;
