//! Storefront HTTP Server
//!
//! Axum binary wiring the payment reconciliation subsystem to the
//! customer-facing pages: localized home, checkout success, the Stripe
//! webhook endpoint, and transactional email.

mod handlers;
mod state;
mod views;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use store_core::{MemoryOrderStore, Order, OrderId, OrderStore, SiteSettings};
use store_mailer::Mailer;
use store_payments::StripeGateway;

use crate::handlers::{
    checkout_success, health_check, home_default, home_localized, stripe_webhook,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let settings = Arc::new(SiteSettings::from_env());
    tracing::info!(site = %settings.name, locale = %settings.default_locale, "settings loaded");

    let orders = build_order_store().await?;

    let gateway = match StripeGateway::from_env() {
        Ok(gateway) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(gateway))
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - payments disabled ({e})");
            tracing::warn!("  Set STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET in .env");
            None
        }
    };

    let mailer = match Mailer::from_env(&settings.sender_name, &settings.sender_email) {
        Ok(mailer) => {
            tracing::info!("✓ Resend configured");
            Some(Arc::new(mailer))
        }
        Err(e) => {
            tracing::warn!("⚠ Resend not configured - receipts disabled ({e})");
            None
        }
    };

    let state = AppState {
        settings,
        orders,
        gateway,
        mailer,
    };

    let app = app(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🛒 storefront running on http://{}", addr);
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  GET  /                      - Home page (default locale)");
    tracing::info!("  GET  /{{locale}}              - Localized home page");
    tracing::info!("  GET  /{{locale}}/checkout/{{id}}/stripe-payment-success");
    tracing::info!("  POST /api/webhooks/stripe   - Stripe webhook");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router
fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(home_default))
        .route("/{locale}", get(home_localized))
        .route(
            "/{locale}/checkout/{order_id}/stripe-payment-success",
            get(checkout_success),
        )
        .route("/api/webhooks/stripe", post(stripe_webhook))
        // Static assets (images, icons)
        .nest_service("/static", tower_http::services::ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Select and initialize the order store.
///
/// Defaults to the in-memory store; with the `storage-postgres`
/// feature and a `DATABASE_URL`, orders live in Postgres instead.
async fn build_order_store() -> anyhow::Result<Arc<dyn OrderStore>> {
    #[cfg(feature = "storage-postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let store = store_core::PgOrderStore::connect(&url).await?;
        tracing::info!("✓ Postgres order store connected");
        return Ok(Arc::new(store));
    }

    let store = Arc::new(MemoryOrderStore::new());
    tracing::info!("using in-memory order store");

    if std::env::var("SEED_DEMO_ORDER").is_ok_and(|v| v == "true") {
        let order = Order::new(
            OrderId::generate(),
            "customer@example.com",
            rust_decimal::Decimal::new(12999, 2),
            "USD",
        );
        tracing::info!(order_id = %order.id, "seeded demo order");
        store.save(&order).await?;
    }

    Ok(store)
}
