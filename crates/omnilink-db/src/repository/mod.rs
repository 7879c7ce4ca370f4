//! # Repository Module
//!
//! Database repository implementations for the commission ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.products().get_by_id("uuid")                               │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)        → Option<Product>                     │
//! │  ├── insert(&self, product)                                            │
//! │  └── list_active(&self)                                                │
//! │       │                                                                 │
//! │       │  SQL (runtime-checked, decoded via FromRow row structs)         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Row structs mirror the columns (cents as i64, percents as TEXT) and   │
//! │  convert into the omnilink-core types, so nothing above this layer     │
//! │  sees a raw column.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BusinessRepository`](business::BusinessRepository) - Business profiles
//! - [`AffiliateRepository`](affiliate::AffiliateRepository) - Affiliate profiles
//! - [`ProductRepository`](product::ProductRepository) - Catalog
//! - [`SelectionRepository`](selection::SelectionRepository) - Affiliate opt-ins
//! - [`ClickRepository`](click::ClickRepository) - Tracked link visits
//! - [`SaleRepository`](sale::SaleRepository) - Append-only sales ledger
//! - [`LedgerRepository`](ledger::LedgerRepository) - Aggregated totals

pub mod affiliate;
pub mod business;
pub mod click;
pub mod ledger;
pub mod product;
pub mod sale;
pub mod selection;

use uuid::Uuid;

/// Generates a new record id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
