//! # store-mailer
//!
//! Best-effort transactional email for the storefront, backed by the
//! Resend HTTP API.
//!
//! Receipt delivery is an enhancement, never part of payment
//! correctness. Everything in this crate can fail without consequence
//! for the order record: callers are expected to log and swallow the
//! errors it returns, and a missing `RESEND_API_KEY` simply means the
//! storefront runs without email.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use store_mailer::{Mailer, ReceiptSender};
//!
//! let mailer = Mailer::from_env("Storefront", "orders@example.com")?;
//! if let Err(e) = mailer.send_purchase_receipt(&order).await {
//!     tracing::warn!(error = %e, "receipt failed");
//! }
//! ```

mod error;
mod mailer;
mod templates;

pub use error::{MailError, Result};
pub use mailer::{Mailer, ReceiptSender};
