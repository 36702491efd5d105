//! # store-core
//!
//! Domain model and shared glue for the storefront: the order entity
//! mutated by payment reconciliation, the order store seam, site
//! settings, and the locale tables behind the customer-facing pages.
//!
//! ## Ownership
//!
//! Orders are long-lived records owned by order management. This crate
//! models only the slice payment reconciliation needs (paid flag,
//! payment result, customer email) and the single operation allowed to
//! mutate it, [`Order::confirm_payment`].

pub mod error;
pub mod i18n;
pub mod order;
pub mod settings;

#[cfg(feature = "storage-postgres")]
pub mod db;

pub use error::{CoreError, Result};
pub use order::{
    ConfirmOutcome, MemoryOrderStore, Order, OrderId, OrderStore, PaymentFacts, PaymentResult,
};
pub use settings::SiteSettings;

#[cfg(feature = "storage-postgres")]
pub use db::PgOrderStore;
