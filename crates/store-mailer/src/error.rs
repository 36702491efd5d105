//! Mail Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, MailError>;

/// Mail delivery errors
#[derive(Error, Debug)]
pub enum MailError {
    /// Mail provider credentials missing
    #[error("mailer configuration error: {0}")]
    Config(String),

    /// Provider rejected the send request
    #[error("mail API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network failure reaching the provider
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
