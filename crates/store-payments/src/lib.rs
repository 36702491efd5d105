//! # store-payments
//!
//! Payment reconciliation for the storefront: the Stripe webhook path
//! that marks orders paid, and the checkout-return path that
//! independently re-verifies payment status when the customer lands on
//! the success page.
//!
//! ## Reconciliation flow
//!
//! ```text
//! ┌────────┐  webhook   ┌───────────────┐        ┌──────────────┐
//! │ Stripe │───────────▶│ verify + parse │──────▶│ confirm order │──▶ receipt (best effort)
//! └────────┘            └───────────────┘        └──────────────┘
//!     │
//!     │ browser redirect  ┌──────────────┐        ┌────────────────┐
//!     └──────────────────▶│ success page │───────▶│ retrieve intent │──▶ rendered outcome
//!                         └──────────────┘        └────────────────┘
//! ```
//!
//! Both paths converge on the same order record. The webhook path is
//! the only writer; the success page is read-only, so either path may
//! run first (or both concurrently) without conflicting writes. The
//! provider delivers webhooks at least once, and the confirmation
//! operation absorbs redeliveries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use store_payments::{StripeGateway, WebhookProcessor, extract_event};
//!
//! let gateway = StripeGateway::from_env()?;
//! let event = gateway.verify_event(&body, &signature)?;
//! let outcome = processor.process(extract_event(&event)?).await?;
//! ```

mod error;
mod gateway;
mod verify;
mod webhook;

pub use error::{PaymentError, Result};
pub use gateway::StripeGateway;
pub use verify::{CheckoutVerification, classify_intent, verify_checkout_return};
pub use webhook::{PaymentEvent, WebhookOutcome, WebhookProcessor, extract_event};
