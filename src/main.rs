use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use chrono_feedback::config::Config;
use chrono_feedback::email::SmtpMailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting Chrono feedback notifier");

    // One authenticated transport for the whole process
    let mailer = SmtpMailer::new(&config.smtp).expect("Failed to configure SMTP transport");
    tracing::info!(
        "SMTP relay {}:{} configured for {}",
        config.smtp.host,
        config.smtp.port,
        config.smtp.user
    );

    let addr = SocketAddr::new(config.host, config.port);
    let (app, state) = chrono_feedback::build_app(config, Arc::new(mailer));
    let cleanup = chrono_feedback::spawn_ledger_cleanup(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
