//! Postgres Order Store
//!
//! Optional backend behind the `storage-postgres` feature. The pool is
//! built once at process start and injected into the handlers that
//! need it; there is no module-level connection singleton.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{CoreError, Result};
use crate::order::{Order, OrderId, OrderStore, PaymentResult};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Postgres-backed order store
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Connect to the order database.
    ///
    /// A failed initial connection is retried once before surfacing a
    /// fatal error.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = || {
            PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(ACQUIRE_TIMEOUT)
        };

        let pool = match options().connect(url).await {
            Ok(pool) => pool,
            Err(first) => {
                tracing::warn!(error = %first, "order store connection failed, retrying once");
                options()
                    .connect(url)
                    .await
                    .map_err(|e| CoreError::Storage(format!("order store connect: {e}")))?
            }
        };

        Ok(Self { pool })
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, user_email, items_total, currency, is_paid, paid_at, \
             payment_event_id, payment_status, payer_email, amount_paid \
             FROM orders WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payment_result = row
            .try_get::<Option<String>, _>("payment_event_id")
            .map_err(storage_error)?
            .map(|provider_event_id| -> Result<PaymentResult> {
                Ok(PaymentResult {
                    provider_event_id,
                    status: row
                        .try_get::<Option<String>, _>("payment_status")
                        .map_err(storage_error)?
                        .unwrap_or_default(),
                    payer_email: row.try_get("payer_email").map_err(storage_error)?,
                    amount_paid: row
                        .try_get::<Option<Decimal>, _>("amount_paid")
                        .map_err(storage_error)?
                        .unwrap_or_default(),
                })
            })
            .transpose()?;

        Ok(Some(Order {
            id: OrderId::from_string(row.try_get::<String, _>("id").map_err(storage_error)?),
            user_email: row.try_get("user_email").map_err(storage_error)?,
            items_total: row.try_get("items_total").map_err(storage_error)?,
            currency: row.try_get("currency").map_err(storage_error)?,
            is_paid: row.try_get("is_paid").map_err(storage_error)?,
            paid_at: row
                .try_get::<Option<DateTime<Utc>>, _>("paid_at")
                .map_err(storage_error)?,
            payment_result,
        }))
    }

    async fn save(&self, order: &Order) -> Result<()> {
        // Single-statement upsert: atomic at single-order granularity.
        sqlx::query(
            "INSERT INTO orders (id, user_email, items_total, currency, is_paid, paid_at, \
             payment_event_id, payment_status, payer_email, amount_paid) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
             user_email = EXCLUDED.user_email, \
             items_total = EXCLUDED.items_total, \
             currency = EXCLUDED.currency, \
             is_paid = EXCLUDED.is_paid, \
             paid_at = EXCLUDED.paid_at, \
             payment_event_id = EXCLUDED.payment_event_id, \
             payment_status = EXCLUDED.payment_status, \
             payer_email = EXCLUDED.payer_email, \
             amount_paid = EXCLUDED.amount_paid",
        )
        .bind(order.id.as_str())
        .bind(&order.user_email)
        .bind(order.items_total)
        .bind(&order.currency)
        .bind(order.is_paid)
        .bind(order.paid_at)
        .bind(order.payment_result.as_ref().map(|p| p.provider_event_id.clone()))
        .bind(order.payment_result.as_ref().map(|p| p.status.clone()))
        .bind(
            order
                .payment_result
                .as_ref()
                .and_then(|p| p.payer_email.clone()),
        )
        .bind(order.payment_result.as_ref().map(|p| p.amount_paid))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}
