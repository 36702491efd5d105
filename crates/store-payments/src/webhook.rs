//! Stripe Webhook Processing
//!
//! Turns a verified provider event into an order state transition.
//! Delivery is at least once: a redelivered confirmation lands on an
//! already-paid order and acknowledges without a second write.

use std::sync::Arc;

use chrono::Utc;
use stripe::{Event, EventObject, EventType};

use store_core::{ConfirmOutcome, Order, OrderId, OrderStore, PaymentFacts};
use store_mailer::ReceiptSender;

use crate::error::{PaymentError, Result};

/// Payment facts extracted from a webhook delivery
#[derive(Clone, Debug)]
pub enum PaymentEvent {
    /// A charge settled; the order it names can be marked paid
    ChargeSucceeded {
        event_id: String,
        order_id: OrderId,
        payer_email: Option<String>,
        amount_minor: i64,
    },

    /// Recognized but irrelevant event type, acknowledged so the
    /// provider does not redeliver it
    Ignored { event_type: String },
}

/// Extract payment facts from a verified Stripe event.
///
/// A `charge.succeeded` event that does not name an order in its
/// metadata cannot be applied to anything and is rejected as
/// malformed.
pub fn extract_event(event: &Event) -> Result<PaymentEvent> {
    match event.type_ {
        EventType::ChargeSucceeded => {
            if let EventObject::Charge(charge) = &event.data.object {
                let order_id = charge.metadata.get("orderId").ok_or_else(|| {
                    PaymentError::MalformedEvent("charge.succeeded without orderId metadata".into())
                })?;

                Ok(PaymentEvent::ChargeSucceeded {
                    event_id: event.id.to_string(),
                    order_id: OrderId::from_string(order_id.clone()),
                    payer_email: charge.billing_details.email.clone(),
                    amount_minor: charge.amount,
                })
            } else {
                Err(PaymentError::MalformedEvent(
                    "charge.succeeded without charge object".into(),
                ))
            }
        }

        _ => Ok(PaymentEvent::Ignored {
            event_type: format!("{:?}", event.type_),
        }),
    }
}

/// What a processed delivery did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Order confirmed paid, or re-acknowledged by a redelivery
    OrderPaid {
        order_id: OrderId,
        already_paid: bool,
    },

    /// Event acknowledged without action
    Ignored { event_type: String },
}

/// Applies verified payment events to the order store.
///
/// The order is always looked up by the id the event itself declares,
/// so a confirmation can never land on a different order than the one
/// the provider charged.
pub struct WebhookProcessor {
    orders: Arc<dyn OrderStore>,
    receipts: Option<Arc<dyn ReceiptSender>>,
}

impl WebhookProcessor {
    pub fn new(orders: Arc<dyn OrderStore>, receipts: Option<Arc<dyn ReceiptSender>>) -> Self {
        Self { orders, receipts }
    }

    /// Process an extracted payment event.
    ///
    /// Storage failures propagate so the caller returns a retryable
    /// response and the provider redelivers. Email failures never do.
    pub async fn process(&self, event: PaymentEvent) -> Result<WebhookOutcome> {
        match event {
            PaymentEvent::ChargeSucceeded {
                event_id,
                order_id,
                payer_email,
                amount_minor,
            } => {
                let mut order = self
                    .orders
                    .find_by_id(&order_id)
                    .await?
                    .ok_or_else(|| PaymentError::OrderNotFound(order_id.to_string()))?;

                let facts = PaymentFacts {
                    provider_event_id: event_id,
                    payer_email,
                    amount_minor,
                };

                match order.confirm_payment(&facts, Utc::now()) {
                    ConfirmOutcome::AlreadyPaid => {
                        tracing::info!(
                            order_id = %order.id,
                            "duplicate confirmation for paid order, acknowledging"
                        );

                        Ok(WebhookOutcome::OrderPaid {
                            order_id: order.id,
                            already_paid: true,
                        })
                    }

                    ConfirmOutcome::Applied => {
                        self.orders.save(&order).await?;

                        tracing::info!(
                            order_id = %order.id,
                            amount = %facts.amount_paid(),
                            "order marked paid"
                        );

                        self.send_notifications(&order).await;

                        Ok(WebhookOutcome::OrderPaid {
                            order_id: order.id,
                            already_paid: false,
                        })
                    }
                }
            }

            PaymentEvent::Ignored { event_type } => {
                tracing::debug!(event_type = %event_type, "unhandled webhook event");
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }

    /// Best effort: a failed send must not fail the reconciliation
    /// that already committed.
    async fn send_notifications(&self, order: &Order) {
        let Some(receipts) = &self.receipts else {
            tracing::debug!(order_id = %order.id, "no mailer configured, skipping receipt");
            return;
        };

        if let Err(e) = receipts.send_purchase_receipt(order).await {
            tracing::warn!(order_id = %order.id, error = %e, "purchase receipt failed");
        }

        if let Err(e) = receipts.send_review_request(order).await {
            tracing::warn!(order_id = %order.id, error = %e, "review request failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use store_core::MemoryOrderStore;
    use store_mailer::MailError;

    struct FailingReceipts;

    #[async_trait]
    impl ReceiptSender for FailingReceipts {
        async fn send_purchase_receipt(&self, _order: &Order) -> store_mailer::Result<()> {
            Err(MailError::Api {
                status: 500,
                message: "mail provider down".into(),
            })
        }

        async fn send_review_request(&self, _order: &Order) -> store_mailer::Result<()> {
            Err(MailError::Api {
                status: 500,
                message: "mail provider down".into(),
            })
        }
    }

    fn charge_succeeded(order_id: &str) -> PaymentEvent {
        PaymentEvent::ChargeSucceeded {
            event_id: "evt_123".into(),
            order_id: OrderId::from_string(order_id),
            payer_email: Some("payer@example.com".into()),
            amount_minor: 12345,
        }
    }

    async fn store_with_unpaid_order(order_id: &str) -> Arc<MemoryOrderStore> {
        let store = Arc::new(MemoryOrderStore::new());
        let order = Order::new(
            OrderId::from_string(order_id),
            "customer@example.com",
            Decimal::new(12345, 2),
            "USD",
        );
        store.save(&order).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_charge_succeeded_marks_order_paid() {
        let store = store_with_unpaid_order("order_1").await;
        let processor = WebhookProcessor::new(store.clone(), None);

        let outcome = processor.process(charge_succeeded("order_1")).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::OrderPaid {
                order_id: OrderId::from_string("order_1"),
                already_paid: false,
            }
        );

        let order = store
            .find_by_id(&OrderId::from_string("order_1"))
            .await
            .unwrap()
            .unwrap();
        assert!(order.is_paid);
        assert!(order.paid_at.is_some());

        let result = order.payment_result.unwrap();
        assert_eq!(result.provider_event_id, "evt_123");
        assert_eq!(result.payer_email.as_deref(), Some("payer@example.com"));
        assert_eq!(result.amount_paid.to_string(), "123.45");
    }

    #[tokio::test]
    async fn test_unknown_order_is_rejected() {
        let store = Arc::new(MemoryOrderStore::new());
        let processor = WebhookProcessor::new(store, None);

        let err = processor
            .process(charge_succeeded("order_missing"))
            .await
            .expect_err("event for unknown order must fail");
        assert!(matches!(err, PaymentError::OrderNotFound(_)));
        assert!(err.is_client_fault());
    }

    #[tokio::test]
    async fn test_redelivery_is_idempotent() {
        let store = store_with_unpaid_order("order_1").await;
        let processor = WebhookProcessor::new(store.clone(), None);

        processor.process(charge_succeeded("order_1")).await.unwrap();
        let after_first = store
            .find_by_id(&OrderId::from_string("order_1"))
            .await
            .unwrap();

        let outcome = processor.process(charge_succeeded("order_1")).await.unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::OrderPaid {
                order_id: OrderId::from_string("order_1"),
                already_paid: true,
            }
        );

        let after_second = store
            .find_by_id(&OrderId::from_string("order_1"))
            .await
            .unwrap();
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_reconciliation() {
        let store = store_with_unpaid_order("order_1").await;
        let processor = WebhookProcessor::new(store.clone(), Some(Arc::new(FailingReceipts)));

        let outcome = processor.process(charge_succeeded("order_1")).await;
        assert!(outcome.is_ok());

        let order = store
            .find_by_id(&OrderId::from_string("order_1"))
            .await
            .unwrap()
            .unwrap();
        assert!(order.is_paid);
    }

    #[tokio::test]
    async fn test_irrelevant_events_are_acknowledged() {
        let store = Arc::new(MemoryOrderStore::new());
        let processor = WebhookProcessor::new(store, None);

        let outcome = processor
            .process(PaymentEvent::Ignored {
                event_type: "invoice.created".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                event_type: "invoice.created".into(),
            }
        );
    }
}
