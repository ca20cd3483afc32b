//! Sentiment classifier service
//!
//! Owns the lifetime of the classification pipeline. The pipeline is loaded
//! once, eagerly, before any request is served:
//!
//! - load succeeds: the service is `Ready` and the pipeline is shared
//!   read-only by every request for the rest of the process
//! - load fails: the service is `Disabled` for good; the failure is logged
//!   once and never retried
//!
//! A disabled classifier never takes the rest of the application down with it.

use crate::normalizer::TextNormalizer;
use crate::pipeline::{load_pipeline, TextPipeline};
use crate::result::SentimentResult;
use moviereview_core::{Error, Result};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Lifecycle state after the load attempt
#[derive(Clone)]
pub enum ServiceState {
    /// Pipeline loaded and serving
    Ready(Arc<dyn TextPipeline>),

    /// Pipeline failed to load
    Disabled { reason: String },
}

/// Externally visible availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Ready,
    Disabled,
}

/// Status report for the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub status: Availability,
    pub pipeline: Option<String>,
    pub reason: Option<String>,
}

/// Review sentiment classifier
#[derive(Clone)]
pub struct SentimentService {
    state: ServiceState,
    normalizer: TextNormalizer,
}

impl SentimentService {
    /// Load the pipeline artifact at `path`.
    ///
    /// A missing or unusable artifact yields a `Disabled` service, not an
    /// error. The only error is a normalizer that cannot be built.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sentiment pipeline from {}", path.display());

        let state = match load_pipeline(path) {
            Ok(pipeline) => {
                info!("Sentiment pipeline '{}' ready", pipeline.name());
                ServiceState::Ready(pipeline)
            }
            Err(e) => {
                error!("Sentiment analysis disabled: {}", e);
                ServiceState::Disabled {
                    reason: e.to_string(),
                }
            }
        };

        Self::from_state(state)
    }

    /// Serve with an already-constructed pipeline
    pub fn with_pipeline(pipeline: Arc<dyn TextPipeline>) -> Result<Self> {
        Self::from_state(ServiceState::Ready(pipeline))
    }

    /// A service that refuses every request
    pub fn disabled(reason: impl Into<String>) -> Result<Self> {
        Self::from_state(ServiceState::Disabled {
            reason: reason.into(),
        })
    }

    fn from_state(state: ServiceState) -> Result<Self> {
        Ok(Self {
            state,
            normalizer: TextNormalizer::new()?,
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// Current availability, pipeline name and failure reason
    pub fn status(&self) -> ServiceStatus {
        match &self.state {
            ServiceState::Ready(pipeline) => ServiceStatus {
                status: Availability::Ready,
                pipeline: Some(pipeline.name().to_string()),
                reason: None,
            },
            ServiceState::Disabled { reason } => ServiceStatus {
                status: Availability::Disabled,
                pipeline: None,
                reason: Some(reason.clone()),
            },
        }
    }

    /// Fail with `ServiceUnavailable` unless the pipeline is loaded
    pub fn ensure_ready(&self) -> Result<()> {
        match &self.state {
            ServiceState::Ready(_) => Ok(()),
            ServiceState::Disabled { reason } => Err(Error::service_unavailable(reason.clone())),
        }
    }

    /// Normalizer producing `cleaned_text`
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Classify one review.
    ///
    /// Errors:
    /// - `ServiceUnavailable` when disabled, checked before the input
    /// - `Validation` when `review_text` is blank
    /// - `Analysis` when the pipeline fails, including panics inside it
    pub fn classify(&self, review_text: &str) -> Result<SentimentResult> {
        let pipeline = match &self.state {
            ServiceState::Ready(pipeline) => pipeline,
            ServiceState::Disabled { reason } => {
                return Err(Error::service_unavailable(reason.clone()))
            }
        };

        if review_text.trim().is_empty() {
            return Err(Error::validation("review text is required"));
        }

        let cleaned_text = self.normalizer.normalize(review_text);

        // The pipeline tokenizes on its own and is given the raw text;
        // `cleaned_text` is for display only.
        let start = Instant::now();
        let (prediction, probabilities) = run_pipeline(pipeline.as_ref(), review_text)?;
        let latency_us = start.elapsed().as_micros() as u64;

        let mut result = SentimentResult::from_pipeline_output(
            prediction,
            probabilities,
            cleaned_text,
            review_text.to_string(),
        );
        result.latency_us = latency_us;

        debug!(
            sentiment = result.sentiment.as_str(),
            confidence = result.confidence,
            latency_us = result.latency_us,
            "Classified review"
        );

        Ok(result)
    }
}

fn run_pipeline(pipeline: &dyn TextPipeline, text: &str) -> Result<(i64, [f64; 2])> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pipeline.classify(text)));

    match outcome {
        Ok(Ok((prediction, probabilities))) => {
            if probabilities.iter().any(|p| !p.is_finite()) {
                return Err(Error::analysis(format!(
                    "pipeline '{}' returned non-finite probabilities {:?}",
                    pipeline.name(),
                    probabilities
                )));
            }
            Ok((prediction, probabilities))
        }
        Ok(Err(Error::Analysis(msg))) => Err(Error::Analysis(msg)),
        Ok(Err(e)) => Err(Error::analysis(e.to_string())),
        Err(payload) => Err(Error::analysis(format!(
            "pipeline '{}' panicked: {}",
            pipeline.name(),
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
