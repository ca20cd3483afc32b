//! MovieReview Sentiment
//!
//! Review sentiment classification for the MovieReview service.
//!
//! Components, in load order:
//! - [`TextNormalizer`]: stateless cleaning of review text for display
//! - [`SentimentService`]: owns a pre-trained [`TextPipeline`] loaded once at
//!   startup and scores reviews against it
//!
//! The bundled pipeline adapter is [`LinearPipeline`], a TF-IDF vectorizer
//! feeding a logistic-regression classifier.

pub mod linear;
pub mod normalizer;
pub mod pipeline;
pub mod result;
pub mod service;

pub use linear::{LinearPipeline, PipelineArtifact};
pub use normalizer::TextNormalizer;
pub use pipeline::{load_pipeline, TextPipeline, POSITIVE_CLASS};
pub use result::{Probabilities, Sentiment, SentimentResult};
pub use service::{Availability, SentimentService, ServiceState, ServiceStatus};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::normalizer::TextNormalizer;
    pub use crate::pipeline::TextPipeline;
    pub use crate::result::{Sentiment, SentimentResult};
    pub use crate::service::SentimentService;
}
