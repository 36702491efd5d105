//! Resend Mailer
//!
//! Thin client over the Resend send endpoint, plus the [`ReceiptSender`]
//! seam the reconciliation flow depends on.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;

use store_core::Order;

use crate::error::{MailError, Result};
use crate::templates;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Review reminders are scheduled this long after confirmation.
const REVIEW_DELAY_HOURS: i64 = 24;

/// Sends order lifecycle email on behalf of the reconciliation flow.
///
/// Semantics are at-most-once effort: a redelivered webhook may resend
/// a receipt (cosmetic duplicate), and a failed send is logged by the
/// caller rather than retried.
#[async_trait]
pub trait ReceiptSender: Send + Sync {
    /// Send the purchase receipt for a confirmed order
    async fn send_purchase_receipt(&self, order: &Order) -> Result<()>;

    /// Ask the customer to review their items, scheduled a day out
    async fn send_review_request(&self, order: &Order) -> Result<()>;
}

/// Resend-backed mailer
pub struct Mailer {
    http: reqwest::Client,
    api_key: String,
    sender_name: String,
    sender_email: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_at: Option<String>,
}

impl Mailer {
    /// Create a new mailer
    pub fn new(
        api_key: impl Into<String>,
        sender_name: impl Into<String>,
        sender_email: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
        }
    }

    /// Create from environment variables.
    ///
    /// A missing key is a configuration fault the caller may treat as
    /// "run without email".
    pub fn from_env(sender_name: &str, sender_email: &str) -> Result<Self> {
        let api_key = std::env::var("RESEND_API_KEY")
            .map_err(|_| MailError::Config("RESEND_API_KEY not set".into()))?;

        Ok(Self::new(api_key, sender_name, sender_email))
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        scheduled_at: Option<String>,
    ) -> Result<()> {
        let request = SendRequest {
            from: format!("{} <{}>", self.sender_name, self.sender_email),
            to: [to],
            subject,
            html,
            scheduled_at,
        };

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api { status, message });
        }

        Ok(())
    }
}

#[async_trait]
impl ReceiptSender for Mailer {
    async fn send_purchase_receipt(&self, order: &Order) -> Result<()> {
        let html = templates::purchase_receipt(order);
        self.send(&order.user_email, "Order Confirmation", &html, None)
            .await?;

        tracing::info!(order_id = %order.id, to = %order.user_email, "purchase receipt sent");
        Ok(())
    }

    async fn send_review_request(&self, order: &Order) -> Result<()> {
        let html = templates::review_request(order);
        let scheduled_at = (Utc::now() + Duration::hours(REVIEW_DELAY_HOURS)).to_rfc3339();
        self.send(
            &order.user_email,
            "Review your order items",
            &html,
            Some(scheduled_at),
        )
        .await?;

        tracing::info!(order_id = %order.id, to = %order.user_email, "review request scheduled");
        Ok(())
    }
}
