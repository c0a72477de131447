//! Error types for query assembly

use thiserror::Error;

/// Errors that can occur while assembling or binding a query
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid comparator: {0}")]
    InvalidComparator(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Placeholder mismatch: {placeholders} placeholder(s) but {values} value(s)")]
    PlaceholderMismatch { placeholders: usize, values: usize },

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl QueryError {
    pub fn invalid_comparator(msg: impl Into<String>) -> Self {
        Self::InvalidComparator(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
