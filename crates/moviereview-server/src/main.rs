//! MovieReview Server
//!
//! Serves review sentiment analysis over HTTP. The sentiment pipeline is
//! loaded before the listener is bound; if it cannot be loaded the server
//! still starts and reports the classifier as unavailable.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{info, warn};

use moviereview_sentiment::SentimentService;
use moviereview_server::{create_router, AppConfig, AppState, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting MovieReview server");

    // Load configuration
    let config = AppConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Pipeline artifact: {}", config.classifier.artifact_path.display());

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Load the classifier once, before accepting requests
    let sentiment = SentimentService::load(&config.classifier.artifact_path)?;
    if !sentiment.is_ready() {
        warn!("Sentiment analysis is disabled; /api/sentiment will answer 503");
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(config, sentiment, metrics_handle);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("moviereview=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moviereview=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "moviereview_sentiment_requests_total",
        "Sentiment requests by outcome"
    );
    metrics::describe_histogram!(
        "moviereview_sentiment_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );
    metrics::describe_counter!(
        "moviereview_sentiment_errors_total",
        "Failed sentiment requests by error kind"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
