//! Set up the `tracing` subscriber for the process.
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Compose the subscriber: an [`EnvFilter`], falling back to `default_filter` if
/// `RUST_LOG` is unset, and a `fmt` layer writing to `sink`.
pub fn get_subscriber<Sink>(
    default_filter: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync + use<Sink>
where
    Sink: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(sink))
}

/// Register `subscriber` as the global default.
///
/// It fails if a global subscriber has already been set.
pub fn init_telemetry(subscriber: impl Subscriber + Send + Sync) -> Result<(), anyhow::Error> {
    set_global_default(subscriber)?;
    Ok(())
}
