//! # pesantren-db: Storage Layer for the Pesantren Ledger
//!
//! SQLite storage for the koperasi product list, the inventory transfer
//! ledger and sale lines, plus the service that feeds those rows to
//! pesantren-core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pesantren Ledger Data Flow                          │
//! │                                                                         │
//! │  seed binary / back office caller                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pesantren-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ product        │    │  (embedded)  │  │   │
//! │  │   │               │    │ transfer, sale │    │ 001_init.sql │  │   │
//! │  │   └───────┬───────┘    └────────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────┐    ┌────────────────┐                      │   │
//! │  │   │ LedgerService │───►│ pesantren-core │  (pure calculators)  │   │
//! │  │   └───────────────┘    └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: kop_barang, transfer_inventaris, penjualan,                    │
//! │          v_penjualan_aset_yayasan                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`config`] - Layered ledger configuration (TOML + env)
//! - [`repository`] - Repository implementations
//! - [`ledger`] - Period summaries and bagi hasil runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pesantren_db::{Database, LedgerConfig};
//!
//! let config = LedgerConfig::load(None)?;
//! let db = Database::new(config.db_config()?).await?;
//!
//! let summary = db.ledger().period_summary(start, end).await?;
//! let result = db
//!     .ledger()
//!     .run_bagi_hasil(&config.bagi_hasil_request("2026-01-01", "2026-01-31", 250_000.0))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::LedgerConfig;
pub use error::{DbError, DbResult};
pub use ledger::LedgerService;
pub use pool::{Database, DbConfig};

pub use repository::product::{Barang, ProductRepository};
pub use repository::sale::{NewPenjualan, Penjualan, ProductSale, SaleRepository};
pub use repository::transfer::{NewTransfer, TransferInventaris, TransferRepository};
