//! Core Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Order store read or write failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Required configuration missing or invalid
    #[error("configuration error: {0}")]
    Config(String),
}
