//! Payment Relay server binary.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use payment_relay::adapters::http::{app_router, WebhookAppState};
use payment_relay::adapters::webhook_log::WebhookLogWriter;
use payment_relay::config::{AppConfig, ServerConfig};
use payment_relay::domain::webhook::{RecentEvents, SignatureVerifier};
use payment_relay::ports::WebhookLogSink;

fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server)?;
    config.validate()?;

    let trust_mode = config.payment.trust_mode();
    if config.accepts_unsigned_in_production() {
        tracing::warn!("Running in production without webhook signature verification");
    } else if !trust_mode.is_verified() {
        tracing::warn!("Webhook signature verification disabled; accepting unsigned events");
    }

    let (log_handle, log_writer) = WebhookLogWriter::spawn(config.webhook_log.options());
    let log_sink: Arc<dyn WebhookLogSink> = Arc::new(log_handle);

    let state = WebhookAppState::new(
        SignatureVerifier::new(trust_mode),
        Arc::new(RecentEvents::default()),
        log_sink,
    );
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        trust_mode = config.payment.trust_mode().as_str(),
        environment = ?config.server.environment,
        "Payment relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last log handle; wait for queued entries to land.
    if let Err(e) = log_writer.await {
        tracing::error!(error = %e, "Webhook log writer terminated abnormally");
    }

    Ok(())
}
