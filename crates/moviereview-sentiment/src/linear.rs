//! Linear TF-IDF pipeline
//!
//! A bag-of-n-grams TF-IDF vectorizer feeding a binary logistic-regression
//! classifier, deserialized from a JSON artifact exported by the offline
//! training job.

use crate::pipeline::TextPipeline;
use moviereview_core::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// On-disk pipeline artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Pipeline name
    #[serde(default = "default_name")]
    pub name: String,

    /// Free-form version tag
    #[serde(default)]
    pub version: Option<String>,

    /// Vectorizer parameters
    pub vectorizer: VectorizerSpec,

    /// Classifier weights
    pub classifier: ClassifierSpec,
}

/// TF-IDF vectorizer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerSpec {
    /// Term (or space-joined n-gram) to feature index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature; raw term frequencies when absent
    #[serde(default)]
    pub idf: Option<Vec<f64>>,

    /// Lowercase the document before tokenizing
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Regex whose matches are the tokens
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    /// Inclusive `(min_n, max_n)` n-gram lengths
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Replace tf with `1 + ln(tf)`
    #[serde(default)]
    pub sublinear_tf: bool,

    /// Clamp counts to 1
    #[serde(default)]
    pub binary: bool,

    /// Row normalization
    #[serde(default)]
    pub norm: Norm,
}

/// Vector normalization applied after weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

/// Binary logistic-regression parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSpec {
    /// One weight per feature
    pub coef: Vec<f64>,

    /// Bias term
    #[serde(default)]
    pub intercept: f64,

    /// Class ids; index 1 is the class predicted for a positive decision value
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
}

fn default_name() -> String {
    "linear-tfidf".to_string()
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// Compiled TF-IDF vectorizer
#[derive(Debug, Clone)]
struct TfidfVectorizer {
    token_re: Regex,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    binary: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    /// Sparse `(feature, weight)` vector for `text`
    fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let doc = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self.token_re.find_iter(&doc).map(|m| m.as_str()).collect();

        let mut counts: HashMap<usize, f64> = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| {
                let mut weight = if self.binary { 1.0 } else { tf };
                if self.sublinear_tf {
                    weight = 1.0 + weight.ln();
                }
                if let Some(idf) = &self.idf {
                    weight *= idf[index];
                }
                (index, weight)
            })
            .collect();

        let magnitude = match self.norm {
            Norm::L2 => features.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Norm::L1 => features.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if magnitude > 0.0 {
            for (_, weight) in &mut features {
                *weight /= magnitude;
            }
        }

        features
    }
}

/// TF-IDF + logistic regression pipeline
#[derive(Debug, Clone)]
pub struct LinearPipeline {
    name: String,
    version: Option<String>,
    vectorizer: TfidfVectorizer,
    coef: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
}

impl LinearPipeline {
    /// Read and validate an artifact from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::artifact(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let artifact: PipelineArtifact = serde_json::from_str(&content).map_err(|e| {
            Error::artifact(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!("Parsed pipeline artifact '{}' from {}", artifact.name, path.display());
        Self::from_artifact(artifact)
    }

    /// Validate an in-memory artifact and compile it
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self> {
        let PipelineArtifact {
            name,
            version,
            vectorizer,
            classifier,
        } = artifact;

        let n_features = classifier.coef.len();
        if n_features == 0 {
            return Err(Error::artifact("classifier has no coefficients"));
        }
        if let Some((term, &index)) = vectorizer
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= n_features)
        {
            return Err(Error::artifact(format!(
                "vocabulary term '{term}' maps to feature {index}, but only {n_features} features exist"
            )));
        }
        if let Some(idf) = &vectorizer.idf {
            if idf.len() != n_features {
                return Err(Error::artifact(format!(
                    "idf has {} entries, expected {}",
                    idf.len(),
                    n_features
                )));
            }
            if idf.iter().any(|v| !v.is_finite()) {
                return Err(Error::artifact("idf contains non-finite values"));
            }
        }
        if classifier.coef.iter().any(|v| !v.is_finite()) || !classifier.intercept.is_finite() {
            return Err(Error::artifact("classifier weights contain non-finite values"));
        }
        if classifier.classes[0] == classifier.classes[1] {
            return Err(Error::artifact("classifier classes must be distinct"));
        }
        let (min_n, max_n) = vectorizer.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::artifact(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        let token_re = Regex::new(&vectorizer.token_pattern)
            .map_err(|e| Error::artifact(format!("invalid token_pattern: {e}")))?;

        Ok(Self {
            name,
            version,
            vectorizer: TfidfVectorizer {
                token_re,
                vocabulary: vectorizer.vocabulary,
                idf: vectorizer.idf,
                lowercase: vectorizer.lowercase,
                ngram_range: vectorizer.ngram_range,
                sublinear_tf: vectorizer.sublinear_tf,
                binary: vectorizer.binary,
                norm: vectorizer.norm,
            },
            coef: classifier.coef,
            intercept: classifier.intercept,
            classes: classifier.classes,
        })
    }

    /// Artifact version tag, if any
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Number of features the classifier expects
    pub fn n_features(&self) -> usize {
        self.coef.len()
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, text: &str) -> f64 {
        self.vectorizer
            .transform(text)
            .into_iter()
            .map(|(index, weight)| self.coef[index] * weight)
            .sum::<f64>()
            + self.intercept
    }

    fn score(&self, text: &str) -> (i64, [f64; 2]) {
        let decision = self.decision_function(text);
        let class = if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        };
        let positive = sigmoid(decision);
        (class, [1.0 - positive, positive])
    }
}

impl TextPipeline for LinearPipeline {
    fn predict(&self, text: &str) -> Result<i64> {
        Ok(self.score(text).0)
    }

    fn predict_probabilities(&self, text: &str) -> Result<[f64; 2]> {
        Ok(self.score(text).1)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, text: &str) -> Result<(i64, [f64; 2])> {
        Ok(self.score(text))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
