//! Error types shared across the crate.

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures reported by an embedding backend.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("provider returned no embedding")]
    EmptyResponse,

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("provider '{provider}' is missing required setting '{setting}'")]
    MissingSetting {
        provider: &'static str,
        setting: &'static str,
    },
}

/// Failures reported by the vector index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("lancedb: {0}")]
    LanceDb(String),

    #[error("vector dimension mismatch: index stores {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector index has not been built yet")]
    Missing,
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Error::Config(error.to_string())
    }
}
