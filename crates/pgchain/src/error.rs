//! Error types for pgchain

use thiserror::Error;

/// Result type alias for pgchain operations
pub type ChainResult<T> = Result<T, ChainError>;

/// Error types for rendering helpers and statement execution
#[derive(Debug, Error)]
pub enum ChainError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver-level failure, passed through as reported by `tokio-postgres`
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A single-row fetch returned no rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Malformed caller input (e.g. a `?` template whose placeholder count does not match)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid or missing configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ChainError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The underlying driver error, if this is one.
    pub fn as_db_error(&self) -> Option<&tokio_postgres::Error> {
        match self {
            Self::Query(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for ChainError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
