use thiserror::Error;

/// Store-layer error type.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Store error wrapper.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    /// Invalid identifier input.
    #[error("invalid id: {0}")]
    InvalidId(String),
    /// Invalid operation name input.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// Actor value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),
    /// Invalid module configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Operation denied for the given context and subjects.
    #[error("context does not permit {operation}({})", .subject_types.join(", "))]
    NotAuthorized {
        operation: String,
        subject_types: Vec<&'static str>,
    },
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}
