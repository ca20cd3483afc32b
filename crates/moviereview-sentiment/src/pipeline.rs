//! Classification pipeline capability
//!
//! Any model adapter that can turn raw review text into a binary class id and
//! a `[negative, positive]` probability pair can back the sentiment service.

use crate::linear::LinearPipeline;
use moviereview_core::Result;
use std::path::Path;
use std::sync::Arc;

/// Class id the service treats as positive
pub const POSITIVE_CLASS: i64 = 1;

/// A pre-trained text classification pipeline (vectorizer + classifier).
///
/// Implementations are read-only after construction and are shared across
/// concurrent requests.
pub trait TextPipeline: Send + Sync {
    /// Discrete class prediction for `text`
    fn predict(&self, text: &str) -> Result<i64>;

    /// Class probabilities for `text`, ordered `[negative, positive]`
    fn predict_probabilities(&self, text: &str) -> Result<[f64; 2]>;

    /// Pipeline name, for status reporting and logs
    fn name(&self) -> &str;

    /// Class prediction and probabilities for `text` in one call.
    ///
    /// Adapters that can derive both from a single scoring pass should
    /// override this.
    fn classify(&self, text: &str) -> Result<(i64, [f64; 2])> {
        Ok((self.predict(text)?, self.predict_probabilities(text)?))
    }
}

/// Load the pipeline artifact stored at `path`
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Arc<dyn TextPipeline>> {
    let pipeline = LinearPipeline::from_file(path)?;
    Ok(Arc::new(pipeline))
}
