use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Cache backend error: {0}")]
    CacheBackend(String),

    #[error("Malformed cache entry for '{0}': {1}")]
    InvalidEntry(String, String),

    #[error("Classifier transport error: {0}")]
    ClassifierTransport(String),

    #[error("Classifier returned HTTP {0}")]
    ClassifierStatus(u16),

    #[error("Capture error: {0}")]
    CaptureFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
