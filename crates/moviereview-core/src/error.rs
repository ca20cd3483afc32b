//! Error types for MovieReview

/// Result type alias using MovieReview's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for MovieReview operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input malformed or empty
    #[error("validation error: {0}")]
    Validation(String),

    /// Classifier artifact failed to load; permanent for the process lifetime
    #[error("sentiment analysis service is unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected failure while running inference
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Pipeline artifact missing, corrupt or inconsistent
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Coarse classification of an [`Error`], used for metrics labels and
/// HTTP status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ServiceUnavailable,
    Analysis,
    Internal,
}

impl ErrorKind {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Analysis => "analysis",
            Self::Internal => "internal",
        }
    }
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new service-unavailable error
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Create a new analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Which bucket of the taxonomy this error falls into
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::Analysis(_) => ErrorKind::Analysis,
            _ => ErrorKind::Internal,
        }
    }
}
