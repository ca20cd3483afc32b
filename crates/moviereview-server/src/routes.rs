//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use moviereview_core::Error;
use moviereview_sentiment::{SentimentResult, ServiceStatus};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/sentiment", post(analyze_sentiment))
        .route("/api/sentiment/status", get(sentiment_status))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "moviereview-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Sentiment analysis request
#[derive(Debug, Serialize, Deserialize)]
struct ReviewRequest {
    #[serde(default)]
    review: Option<String>,
}

/// Classify a review
async fn analyze_sentiment(
    State(state): State<AppState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<SentimentResult>, AppError> {
    let outcome = classify_request(&state, payload);

    match &outcome {
        Ok(result) => {
            metrics::counter!(
                "moviereview_sentiment_requests_total",
                "outcome" => result.sentiment.as_str()
            )
            .increment(1);
            metrics::histogram!("moviereview_sentiment_latency_us")
                .record(result.latency_us as f64);
            info!(
                "Review classified as {} ({:.2}%)",
                result.sentiment.as_str(),
                result.confidence
            );
        }
        Err(e) => {
            metrics::counter!(
                "moviereview_sentiment_requests_total",
                "outcome" => "error"
            )
            .increment(1);
            metrics::counter!(
                "moviereview_sentiment_errors_total",
                "kind" => e.kind().as_str()
            )
            .increment(1);
        }
    }

    Ok(Json(outcome?))
}

fn classify_request(
    state: &AppState,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<SentimentResult, Error> {
    // Availability is decided before the body is looked at; an oversized
    // body surfaces here as a rejection, never ahead of this check
    state.sentiment.ensure_ready()?;

    let Json(request) = payload.map_err(|rejection| {
        debug!("Malformed sentiment request: {}", rejection.body_text());
        Error::validation(format!("invalid request body: {}", rejection.body_text()))
    })?;

    let review = request
        .review
        .ok_or_else(|| Error::validation("review text is required"))?;

    state.sentiment.classify(&review)
}

async fn sentiment_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.sentiment.status())
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
