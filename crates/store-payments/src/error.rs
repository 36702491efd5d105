//! Payment Error Types
//!
//! Faults that could leave order state inconsistent (storage, provider
//! transport on the webhook path) must surface as retryable so the
//! provider redelivers the event. Verification and data-integrity
//! faults are client errors and never come with a state mutation.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Required payment credentials missing
    #[error("payment configuration error: {0}")]
    Config(String),

    /// Webhook signature verification failed
    #[error("webhook signature invalid: {0}")]
    SignatureInvalid(String),

    /// Webhook payload malformed or missing required metadata
    #[error("malformed payment event: {0}")]
    MalformedEvent(String),

    /// Referenced order does not exist in the order store
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Stripe API error
    #[error("payment provider error: {0}")]
    Provider(String),

    /// Order store failure
    #[error("storage error: {0}")]
    Storage(#[from] store_core::CoreError),
}

impl PaymentError {
    /// Whether the provider should redeliver the triggering event
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Storage(_))
    }

    /// Client faults get a 400-class response and no redelivery
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::SignatureInvalid(_) | Self::MalformedEvent(_) | Self::OrderNotFound(_)
        )
    }
}
