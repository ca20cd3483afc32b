//! Sentiment classification result

use crate::pipeline::POSITIVE_CLASS;
use serde::{Deserialize, Serialize};

/// Binary sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Map a pipeline class id to a label; only the positive class is positive
    pub fn from_prediction(prediction: i64) -> Self {
        if prediction == POSITIVE_CLASS {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Per-class probabilities, as percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub negative: f64,
    pub positive: f64,
}

/// Outcome of classifying one review.
///
/// Serializes directly as the success body of the sentiment endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Label derived from `prediction`
    pub sentiment: Sentiment,

    /// Highest class probability, percentage rounded to 2 places
    pub confidence: f64,

    /// Raw class id from the pipeline
    pub prediction: i64,

    /// Normalized copy of the review, informational only
    pub cleaned_text: String,

    /// Review exactly as submitted
    pub original_text: String,

    /// Per-class probabilities, each rounded independently
    pub probabilities: Probabilities,

    /// Time spent in the pipeline, in microseconds
    #[serde(skip)]
    pub latency_us: u64,
}

impl SentimentResult {
    /// Assemble a result from raw pipeline output.
    ///
    /// `probabilities` are fractions ordered `[negative, positive]`. Each
    /// displayed value is rounded on its own, so the pair may not sum to
    /// exactly 100.
    pub fn from_pipeline_output(
        prediction: i64,
        probabilities: [f64; 2],
        cleaned_text: String,
        original_text: String,
    ) -> Self {
        let [negative, positive] = probabilities;
        Self {
            sentiment: Sentiment::from_prediction(prediction),
            confidence: round2(negative.max(positive) * 100.0),
            prediction,
            cleaned_text,
            original_text,
            probabilities: Probabilities {
                negative: round2(negative * 100.0),
                positive: round2(positive * 100.0),
            },
            latency_us: 0,
        }
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
