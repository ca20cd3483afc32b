//! HTTP error responses
//!
//! Every failure on the sentiment endpoint renders the same body shape so
//! clients can show an "unavailable" state without special-casing:
//! `{"error": ..., "sentiment": "unknown", "confidence": 0}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moviereview_core::{Error, ErrorKind};
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Unavailable(String),
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err.kind() {
            ErrorKind::Validation => AppError::InvalidRequest(err.to_string()),
            ErrorKind::ServiceUnavailable => {
                AppError::Unavailable("Sentiment analysis service is unavailable".to_string())
            }
            ErrorKind::Analysis | ErrorKind::Internal => AppError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::InvalidRequest(msg) => {
                warn!("Rejected request: {}", msg);
                msg
            }
            AppError::Unavailable(msg) => msg,
            AppError::InternalError(msg) => {
                error!("Request failed: {}", msg);
                msg
            }
        };

        let body = json!({
            "error": message,
            "sentiment": "unknown",
            "confidence": 0,
        });

        (status, Json(body)).into_response()
    }
}
