//! Sentiment service tests
//!
//! Drives `SentimentService` through configurable mock pipelines to cover
//! readiness, validation, error conversion and result invariants.

use moviereview_core::{Error, Result};
use moviereview_sentiment::{
    Sentiment, SentimentService, TextPipeline, POSITIVE_CLASS,
};
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("moviereview=debug")
        .with_test_writer()
        .try_init();
}

/// A pipeline returning fixed output and recording what it was given
struct FixedPipeline {
    prediction: i64,
    probabilities: [f64; 2],
    call_count: AtomicU32,
    last_text: Mutex<Option<String>>,
}

impl FixedPipeline {
    fn new(prediction: i64, probabilities: [f64; 2]) -> Self {
        Self {
            prediction,
            probabilities,
            call_count: AtomicU32::new(0),
            last_text: Mutex::new(None),
        }
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }
}

impl TextPipeline for FixedPipeline {
    fn predict(&self, text: &str) -> Result<i64> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_text.lock().unwrap() = Some(text.to_string());
        Ok(self.prediction)
    }

    fn predict_probabilities(&self, _text: &str) -> Result<[f64; 2]> {
        Ok(self.probabilities)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// A pipeline that always returns an error
struct FailingPipeline;

impl TextPipeline for FailingPipeline {
    fn predict(&self, _text: &str) -> Result<i64> {
        Err(Error::artifact("feature matrix shape mismatch"))
    }

    fn predict_probabilities(&self, _text: &str) -> Result<[f64; 2]> {
        Err(Error::artifact("feature matrix shape mismatch"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// A pipeline that panics mid-inference
struct PanickingPipeline;

impl TextPipeline for PanickingPipeline {
    fn predict(&self, _text: &str) -> Result<i64> {
        panic!("index out of bounds in vectorizer")
    }

    fn predict_probabilities(&self, _text: &str) -> Result<[f64; 2]> {
        Ok([0.5, 0.5])
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// A pipeline that only answers through the combined `classify` call
struct SinglePassPipeline {
    classify_count: AtomicU32,
}

impl TextPipeline for SinglePassPipeline {
    fn predict(&self, _text: &str) -> Result<i64> {
        panic!("predict called separately")
    }

    fn predict_probabilities(&self, _text: &str) -> Result<[f64; 2]> {
        panic!("predict_probabilities called separately")
    }

    fn name(&self) -> &str {
        "single-pass"
    }

    fn classify(&self, _text: &str) -> Result<(i64, [f64; 2])> {
        self.classify_count.fetch_add(1, Ordering::Relaxed);
        Ok((1, [0.25, 0.75]))
    }
}

/// A pipeline that takes a fixed amount of time per call
struct SlowPipeline {
    delay: Duration,
}

impl TextPipeline for SlowPipeline {
    fn predict(&self, _text: &str) -> Result<i64> {
        std::thread::sleep(self.delay);
        Ok(0)
    }

    fn predict_probabilities(&self, _text: &str) -> Result<[f64; 2]> {
        Ok([0.6, 0.4])
    }

    fn name(&self) -> &str {
        "slow"
    }
}

fn service_with(pipeline: Arc<dyn TextPipeline>) -> SentimentService {
    SentimentService::with_pipeline(pipeline).unwrap()
}

#[test]
fn test_positive_review() {
    init_tracing();
    let service = service_with(Arc::new(FixedPipeline::new(1, [0.12, 0.88])));

    let result = service
        .classify("This movie was absolutely wonderful!")
        .unwrap();

    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.confidence, 88.0);
    assert_eq!(result.prediction, 1);
    assert_eq!(result.probabilities.negative, 12.0);
    assert_eq!(result.probabilities.positive, 88.0);
    assert_eq!(result.original_text, "This movie was absolutely wonderful!");
    assert_eq!(result.cleaned_text, "movie absolutely wonderful");
}

#[test]
fn test_negative_review() {
    let service = service_with(Arc::new(FixedPipeline::new(0, [0.91, 0.09])));

    let result = service.classify("Dull and far too long").unwrap();
    assert_eq!(result.sentiment, Sentiment::Negative);
    assert_eq!(result.confidence, 91.0);
    assert_eq!(result.prediction, 0);
}

#[test]
fn test_blank_review_is_validation_error() {
    let pipeline = Arc::new(FixedPipeline::new(1, [0.2, 0.8]));
    let service = service_with(pipeline.clone());

    for blank in ["", "   ", "\n\t "] {
        let err = service.classify(blank).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    }
    assert_eq!(pipeline.call_count(), 0);
}

#[test]
fn test_disabled_service_checked_before_input() {
    let service = SentimentService::disabled("artifact missing").unwrap();

    assert!(matches!(
        service.classify(""),
        Err(Error::ServiceUnavailable(_))
    ));
    assert!(matches!(
        service.classify("A fine film"),
        Err(Error::ServiceUnavailable(_))
    ));
}

#[test]
fn test_pipeline_receives_raw_text() {
    // The pipeline sees the untouched review, not the cleaned copy
    let pipeline = Arc::new(FixedPipeline::new(1, [0.3, 0.7]));
    let service = service_with(pipeline.clone());

    let raw = "  <i>Loved</i> it, 10/10!  ";
    let result = service.classify(raw).unwrap();

    assert_eq!(pipeline.last_text().as_deref(), Some(raw));
    assert_eq!(result.original_text, raw);
    assert_eq!(result.cleaned_text, "loved");
}

#[test]
fn test_pipeline_error_becomes_analysis_error() {
    let service = service_with(Arc::new(FailingPipeline));

    let err = service.classify("Anything").unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
    assert!(err.to_string().contains("feature matrix shape mismatch"));
}

#[test]
fn test_pipeline_panic_becomes_analysis_error() {
    let service = service_with(Arc::new(PanickingPipeline));

    let err = service.classify("Anything").unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
    assert!(err.to_string().contains("index out of bounds in vectorizer"));

    // The service keeps serving after a failed request
    let err = service.classify("Again").unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
}

#[test]
fn test_pipeline_scored_in_one_call() {
    let pipeline = Arc::new(SinglePassPipeline {
        classify_count: AtomicU32::new(0),
    });
    let service = service_with(pipeline.clone());

    let result = service.classify("One pass is enough").unwrap();
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.confidence, 75.0);
    assert_eq!(pipeline.classify_count.load(Ordering::Relaxed), 1);
}

#[test]
fn test_latency_measures_pipeline_call() {
    let delay = Duration::from_millis(20);
    let service = service_with(Arc::new(SlowPipeline { delay }));

    let result = service.classify("Worth the wait").unwrap();
    assert!(result.latency_us >= delay.as_micros() as u64);
    assert_eq!(result.sentiment, Sentiment::Negative);
}

#[test]
fn test_non_finite_probabilities_rejected() {
    let service = service_with(Arc::new(FixedPipeline::new(1, [f64::NAN, 0.5])));

    let err = service.classify("Anything").unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
}

#[test]
fn test_result_invariants() {
    let cases = [
        (1, [0.12, 0.88]),
        (0, [0.5, 0.5]),
        (0, [0.999_999, 0.000_001]),
        (1, [0.333_35, 0.666_65]),
        (1, [0.004_999, 0.995_001]),
    ];

    for (prediction, probabilities) in cases {
        let service = service_with(Arc::new(FixedPipeline::new(prediction, probabilities)));
        let result = service.classify("Some review").unwrap();

        let sum = result.probabilities.negative + result.probabilities.positive;
        assert!((sum - 100.0).abs() <= 0.02, "sum {sum} for {probabilities:?}");
        assert_eq!(
            result.confidence,
            result.probabilities.negative.max(result.probabilities.positive)
        );
        assert_eq!(
            result.sentiment == Sentiment::Positive,
            result.prediction == POSITIVE_CLASS
        );
    }
}

#[test]
fn test_concurrent_classification() {
    let pipeline = Arc::new(FixedPipeline::new(1, [0.2, 0.8]));
    let service = Arc::new(service_with(pipeline.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    let result = service.classify(&format!("Review number {i}")).unwrap();
                    assert_eq!(result.sentiment, Sentiment::Positive);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(pipeline.call_count(), 200);
}

#[test]
fn test_load_real_artifact() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "name": "reviews-lr",
            "vectorizer": {{"vocabulary": {{"wonderful": 0, "waste": 1}}}},
            "classifier": {{"coef": [3.0, -3.0], "intercept": 0.0}}
        }}"#
    )
    .unwrap();

    let service = SentimentService::load(file.path()).unwrap();
    assert!(service.is_ready());
    assert_eq!(service.status().pipeline.as_deref(), Some("reviews-lr"));

    let result = service
        .classify("This movie was absolutely wonderful!")
        .unwrap();
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.prediction, 1);

    let result = service.classify("<b>Terrible</b> 100% waste of time!!").unwrap();
    assert_eq!(result.sentiment, Sentiment::Negative);
    assert_eq!(result.cleaned_text, "terrible waste time");
}

#[test]
fn test_load_corrupt_artifact_disables() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"vectorizer\": 12}}").unwrap();

    let service = SentimentService::load(file.path()).unwrap();
    assert!(!service.is_ready());
    assert!(service.status().reason.unwrap().contains("artifact error"));
}

#[test]
fn test_bundled_fixture_artifact() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/sentiment_pipeline.json");
    let service = SentimentService::load(path).unwrap();
    assert!(service.is_ready());

    let result = service
        .classify("An excellent, wonderful film. Highly recommend!")
        .unwrap();
    assert_eq!(result.sentiment, Sentiment::Positive);

    let result = service
        .classify("Boring and dull. The worst two hours, a total waste.")
        .unwrap();
    assert_eq!(result.sentiment, Sentiment::Negative);
}
