//! Stripe Gateway
//!
//! Wrapper around the Stripe client holding the webhook signing secret
//! alongside it, so both halves of the reconciliation flow share one
//! configured handle.

use std::str::FromStr;
use std::time::Duration;

use stripe::{Client, Event, PaymentIntent, PaymentIntentId, Webhook};

use crate::error::{PaymentError, Result};

/// Bound on provider calls made while rendering customer-facing pages.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
    webhook_secret: String,
}

impl StripeGateway {
    /// Create a new gateway
    pub fn new(secret_key: &str, webhook_secret: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret: webhook_secret.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| PaymentError::Config("STRIPE_WEBHOOK_SECRET not set".into()))?;

        Ok(Self::new(&secret_key, &webhook_secret))
    }

    /// Get the webhook secret
    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    /// Verify a webhook signature and parse the event
    pub fn verify_event(&self, payload: &str, signature: &str) -> Result<Event> {
        Webhook::construct_event(payload, signature, &self.webhook_secret)
            .map_err(|e| PaymentError::SignatureInvalid(e.to_string()))
    }

    /// Retrieve a payment intent, bounded so a slow provider cannot
    /// hang a page render.
    pub async fn retrieve_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent> {
        let id = PaymentIntentId::from_str(intent_id).map_err(|e| {
            PaymentError::MalformedEvent(format!("invalid payment intent id: {e}"))
        })?;

        let fetch = PaymentIntent::retrieve(&self.client, &id, &[]);
        match tokio::time::timeout(PROVIDER_TIMEOUT, fetch).await {
            Ok(result) => result.map_err(|e| PaymentError::Provider(e.to_string())),
            Err(_) => Err(PaymentError::Provider(
                "payment intent lookup timed out".into(),
            )),
        }
    }

    /// Get the underlying Stripe client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_signature_is_rejected() {
        let gateway = StripeGateway::new("sk_test_123", "whsec_test");
        let err = gateway
            .verify_event("{}", "t=1,v1=deadbeef")
            .expect_err("bogus signature must not verify");
        assert!(matches!(err, PaymentError::SignatureInvalid(_)));
    }

    #[tokio::test]
    async fn test_garbage_intent_id_is_rejected_before_any_call() {
        let gateway = StripeGateway::new("sk_test_123", "whsec_test");
        let err = gateway
            .retrieve_payment_intent("not-a-payment-intent")
            .await
            .expect_err("malformed id must not reach the provider");
        assert!(matches!(err, PaymentError::MalformedEvent(_)));
    }
}
