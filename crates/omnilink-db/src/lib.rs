//! # omnilink-db: Database Layer for the Commission Ledger
//!
//! SQLite storage for the marketplace catalog and the immutable sales
//! ledger, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledger Data Flow                                 │
//! │                                                                         │
//! │  SaleService::record_sale / LedgerService::affiliate_ledger            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   omnilink-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ product, sale  │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ ledger, click  │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │    │ selection, ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use omnilink_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./omnilink.db")).await?;
//! let ledger = db.ledger().affiliate_totals("affiliate-id").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::affiliate::AffiliateRepository;
pub use repository::business::BusinessRepository;
pub use repository::click::ClickRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::selection::SelectionRepository;
