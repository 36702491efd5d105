//! Checkout-Return Verification
//!
//! Read-only fallback for the browser redirect from hosted checkout.
//! The webhook path stays the authoritative writer; this path only
//! decides which view the customer sees, so every provider or store
//! failure degrades to a rendered outcome instead of propagating.

use stripe::PaymentIntentStatus;

use store_core::{Order, OrderId, OrderStore};

use crate::error::PaymentError;
use crate::gateway::StripeGateway;

/// Outcome of re-verifying a checkout return
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutVerification {
    /// Payment succeeded and the intent names this order
    Confirmed,

    /// Payment not finished; send the customer back to checkout
    RetryCheckout,

    /// Order unknown, or the intent does not belong to it
    NotFound,

    /// Gateway unconfigured; the webhook path will settle the order
    Processing,

    /// Provider or store failure while verifying
    Failed(String),
}

/// Re-verify a checkout return against the provider.
///
/// Runs without trusting the webhook to have fired yet, and never
/// mutates the order.
pub async fn verify_checkout_return(
    gateway: Option<&StripeGateway>,
    orders: &dyn OrderStore,
    order_id: &OrderId,
    payment_intent_id: &str,
) -> CheckoutVerification {
    let Some(gateway) = gateway else {
        tracing::error!("stripe gateway not configured, degrading to processing view");
        return CheckoutVerification::Processing;
    };

    let order = match orders.find_by_id(order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => return CheckoutVerification::NotFound,
        Err(e) => {
            tracing::error!(order_id = %order_id, error = %e, "order lookup failed during verification");
            return CheckoutVerification::Failed(e.to_string());
        }
    };

    match gateway.retrieve_payment_intent(payment_intent_id).await {
        Ok(intent) => classify_intent(
            &order,
            intent.metadata.get("orderId").map(String::as_str),
            intent.status,
        ),
        Err(PaymentError::MalformedEvent(reason)) => {
            // A return URL carrying a reference that cannot even be a
            // payment intent is misrouting, not a provider outage.
            tracing::warn!(order_id = %order_id, %reason, "rejecting unusable payment intent reference");
            CheckoutVerification::NotFound
        }
        Err(e) => {
            tracing::error!(order_id = %order_id, error = %e, "payment verification failed");
            CheckoutVerification::Failed(e.to_string())
        }
    }
}

/// Compare the provider's view of an intent against the stored order.
///
/// An intent whose metadata names a different order (or none) must not
/// confirm this one.
pub fn classify_intent(
    order: &Order,
    intent_order_id: Option<&str>,
    status: PaymentIntentStatus,
) -> CheckoutVerification {
    match intent_order_id {
        Some(declared) if declared == order.id.as_str() => {
            if status == PaymentIntentStatus::Succeeded {
                CheckoutVerification::Confirmed
            } else {
                CheckoutVerification::RetryCheckout
            }
        }
        _ => CheckoutVerification::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use store_core::MemoryOrderStore;

    fn order() -> Order {
        Order::new(
            OrderId::from_string("order_1"),
            "customer@example.com",
            Decimal::new(9999, 2),
            "USD",
        )
    }

    #[test]
    fn test_succeeded_intent_with_matching_order_confirms() {
        let verification = classify_intent(&order(), Some("order_1"), PaymentIntentStatus::Succeeded);
        assert_eq!(verification, CheckoutVerification::Confirmed);
    }

    #[test]
    fn test_unfinished_intent_sends_customer_back_to_checkout() {
        let verification = classify_intent(&order(), Some("order_1"), PaymentIntentStatus::Processing);
        assert_eq!(verification, CheckoutVerification::RetryCheckout);

        let verification = classify_intent(
            &order(),
            Some("order_1"),
            PaymentIntentStatus::RequiresPaymentMethod,
        );
        assert_eq!(verification, CheckoutVerification::RetryCheckout);
    }

    #[test]
    fn test_mismatched_or_missing_metadata_is_not_found() {
        let verification = classify_intent(&order(), Some("order_2"), PaymentIntentStatus::Succeeded);
        assert_eq!(verification, CheckoutVerification::NotFound);

        let verification = classify_intent(&order(), None, PaymentIntentStatus::Succeeded);
        assert_eq!(verification, CheckoutVerification::NotFound);
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_degrades_to_processing() {
        let store = MemoryOrderStore::new();
        let verification = verify_checkout_return(
            None,
            &store,
            &OrderId::from_string("order_1"),
            "pi_123",
        )
        .await;
        assert_eq!(verification, CheckoutVerification::Processing);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let gateway = StripeGateway::new("sk_test_123", "whsec_test");
        let store = MemoryOrderStore::new();
        let verification = verify_checkout_return(
            Some(&gateway),
            &store,
            &OrderId::from_string("order_missing"),
            "pi_123",
        )
        .await;
        assert_eq!(verification, CheckoutVerification::NotFound);
    }

    #[tokio::test]
    async fn test_garbage_intent_reference_is_not_found() {
        let gateway = StripeGateway::new("sk_test_123", "whsec_test");
        let store = MemoryOrderStore::new();
        store.save(&order()).await.unwrap();

        let verification = verify_checkout_return(
            Some(&gateway),
            &store,
            &OrderId::from_string("order_1"),
            "not-a-payment-intent",
        )
        .await;
        assert_eq!(verification, CheckoutVerification::NotFound);
    }
}
