//! Order Model and Storage
//!
//! The order entity as payment reconciliation sees it, plus the store
//! seam the reconciliation flow reads and writes through.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Status label written on a completed reconciliation.
pub const PAYMENT_COMPLETED: &str = "COMPLETED";

/// Order identifier as issued by the order store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Generate a fresh identifier (dev seeding, tests)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Parse from string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a successful reconciliation, written exactly once per
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Provider event id the confirmation was derived from
    pub provider_event_id: String,

    /// Status label, [`PAYMENT_COMPLETED`] on success
    pub status: String,

    /// Email the payer used at the provider, if it reported one
    pub payer_email: Option<String>,

    /// Amount actually paid, in major units with two decimals
    pub amount_paid: Decimal,
}

/// Payment facts extracted from a provider event.
///
/// Ephemeral: consumed by [`Order::confirm_payment`] and discarded.
/// The provider may deliver the same event more than once; the
/// confirmation operation absorbs redeliveries.
#[derive(Clone, Debug)]
pub struct PaymentFacts {
    /// Provider event id
    pub provider_event_id: String,

    /// Payer email as reported by the provider
    pub payer_email: Option<String>,

    /// Amount in minor currency units (e.g. cents)
    pub amount_minor: i64,
}

impl PaymentFacts {
    /// Convert the provider's minor-unit amount to a two-decimal
    /// amount in major units (12345 becomes 123.45).
    pub fn amount_paid(&self) -> Decimal {
        Decimal::new(self.amount_minor, 2)
    }
}

/// What applying a confirmation did to the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Order transitioned from unpaid to paid
    Applied,

    /// Order was already paid; nothing changed
    AlreadyPaid,
}

/// An order record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identity
    pub id: OrderId,

    /// Email of the customer the order belongs to
    pub user_email: String,

    /// Order total in major units
    pub items_total: Decimal,

    /// Currency code for the order total
    pub currency: String,

    /// Whether payment has been confirmed
    pub is_paid: bool,

    /// When payment was confirmed, set exactly once
    pub paid_at: Option<DateTime<Utc>>,

    /// Reconciliation record, written exactly once
    pub payment_result: Option<PaymentResult>,
}

impl Order {
    /// Create a new, unpaid order
    pub fn new(
        id: OrderId,
        user_email: impl Into<String>,
        items_total: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_email: user_email.into(),
            items_total,
            currency: currency.into(),
            is_paid: false,
            paid_at: None,
            payment_result: None,
        }
    }

    /// Apply a payment confirmation.
    ///
    /// Idempotent: an already-paid order is left untouched and the
    /// call reports [`ConfirmOutcome::AlreadyPaid`] instead of failing,
    /// so webhook redeliveries acknowledge cleanly. `is_paid` only ever
    /// moves from false to true here; nothing in this subsystem resets
    /// it.
    pub fn confirm_payment(&mut self, facts: &PaymentFacts, now: DateTime<Utc>) -> ConfirmOutcome {
        if self.is_paid {
            return ConfirmOutcome::AlreadyPaid;
        }

        self.is_paid = true;
        self.paid_at = Some(now);
        self.payment_result = Some(PaymentResult {
            provider_event_id: facts.provider_event_id.clone(),
            status: PAYMENT_COMPLETED.to_string(),
            payer_email: facts.payer_email.clone(),
            amount_paid: facts.amount_paid(),
        });

        ConfirmOutcome::Applied
    }
}

/// Order storage trait.
///
/// `save` must replace the stored record atomically at single-order
/// granularity so concurrent webhook redeliveries race onto an
/// idempotent target state rather than interleaving partial writes.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Look up an order by id
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>>;

    /// Persist the full order record
    async fn save(&self, order: &Order) -> Result<()>;
}

/// In-memory order store (for development and tests)
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().unwrap();
        Ok(orders.get(id).cloned())
    }

    async fn save(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().unwrap();
        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpaid_order() -> Order {
        Order::new(
            OrderId::from_string("order_1"),
            "customer@example.com",
            Decimal::new(12345, 2),
            "USD",
        )
    }

    fn facts() -> PaymentFacts {
        PaymentFacts {
            provider_event_id: "evt_123".into(),
            payer_email: Some("payer@example.com".into()),
            amount_minor: 12345,
        }
    }

    #[test]
    fn test_confirm_payment_marks_order_paid() {
        let mut order = unpaid_order();
        let now = Utc::now();

        let outcome = order.confirm_payment(&facts(), now);

        assert_eq!(outcome, ConfirmOutcome::Applied);
        assert!(order.is_paid);
        assert_eq!(order.paid_at, Some(now));

        let result = order.payment_result.expect("payment result written");
        assert_eq!(result.provider_event_id, "evt_123");
        assert_eq!(result.status, PAYMENT_COMPLETED);
        assert_eq!(result.payer_email.as_deref(), Some("payer@example.com"));
        assert_eq!(result.amount_paid.to_string(), "123.45");
    }

    #[test]
    fn test_confirm_payment_is_idempotent() {
        let mut order = unpaid_order();
        let first = Utc::now();
        order.confirm_payment(&facts(), first);
        let after_first = order.clone();

        let outcome = order.confirm_payment(&facts(), Utc::now());

        assert_eq!(outcome, ConfirmOutcome::AlreadyPaid);
        assert_eq!(order, after_first);
    }

    #[test]
    fn test_minor_unit_conversion() {
        let facts = PaymentFacts {
            provider_event_id: "evt_1".into(),
            payer_email: None,
            amount_minor: 100,
        };
        assert_eq!(facts.amount_paid().to_string(), "1.00");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryOrderStore::new();
        let order = unpaid_order();

        store.save(&order).await.unwrap();
        let found = store.find_by_id(&order.id).await.unwrap();
        assert_eq!(found, Some(order));

        let missing = store
            .find_by_id(&OrderId::from_string("order_missing"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
