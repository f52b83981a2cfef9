use anyhow::Context;
use clap::Parser;
use tracing_log_error::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};
use turnstile::{ApplicationState, route_request};
use turnstile_http::server::Server;
use turnstile_server::configuration::{ApplicationProfile, Config};
use turnstile_server::network::discover_served_from;
use turnstile_server::telemetry::{get_subscriber, init_telemetry};

#[derive(Parser, Debug)]
#[command(version, about = "Serve a login form backed by signed session cookies")]
struct Cli {
    /// The color of the page heading. It overrides `instance.color`.
    #[arg(long)]
    color: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("info", std::io::stdout);
    init_telemetry(subscriber)?;

    // A single choke point where fatal errors are logged before the process exits.
    if let Err(e) = _main(Cli::parse()).await {
        tracing::event!(
            tracing::Level::ERROR,
            { ERROR_MESSAGE } = error_message(&e),
            { ERROR_DETAILS } = error_details(&e),
            "The application is exiting due to an error"
        );
        std::process::exit(1);
    }

    Ok(())
}

async fn _main(cli: Cli) -> anyhow::Result<()> {
    let default_profile = if cfg!(debug_assertions) {
        Some(ApplicationProfile::Dev)
    } else {
        None
    };
    let mut config = Config::load(default_profile)?;
    if let Some(color) = cli.color {
        config.app.instance.color = color;
    }

    let application_state = ApplicationState::new(&config.app, discover_served_from())
        .context("Failed to build the application state")?;

    let tcp_listener = config
        .server
        .listener()
        .await
        .context("Failed to bind the server TCP listener")?;
    let address = tcp_listener
        .local_addr()
        .context("The server TCP listener doesn't have a local socket address")?;

    tracing::info!("Starting to listen for incoming requests at {}", address);
    let server_handle = Server::new()
        .set_config(config.server.server_configuration())
        .listen(tcp_listener)
        .serve(route_request, application_state)
        .context("Failed to start the server")?;

    let shutdown_mode = config.server.shutdown_mode();
    let handle = server_handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing_log_error::log_error!(e, "Failed to listen for the shutdown signal");
            return;
        }
        tracing::info!("Shutting down");
        handle.shutdown(shutdown_mode).await;
    });

    server_handle.await;
    Ok(())
}
