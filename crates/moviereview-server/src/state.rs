//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use moviereview_sentiment::SentimentService;
use std::sync::Arc;

use crate::config::AppConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Sentiment classifier, read-only after startup
    pub sentiment: Arc<SentimentService>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        sentiment: SentimentService,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sentiment: Arc::new(sentiment),
            metrics_handle,
        }
    }
}
