//! Application State

use std::sync::Arc;

use store_core::{OrderStore, SiteSettings};
use store_mailer::Mailer;
use store_payments::StripeGateway;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Site metadata and mail sender identity
    pub settings: Arc<SiteSettings>,

    /// Order store the reconciliation flow reads and writes
    pub orders: Arc<dyn OrderStore>,

    /// Stripe gateway (None if not configured)
    pub gateway: Option<Arc<StripeGateway>>,

    /// Mailer (None if not configured; receipts are skipped)
    pub mailer: Option<Arc<Mailer>>,
}
