//! # pesantren-core: Pure Ledger Logic for the Pesantren Back Office
//!
//! Profit sharing (bagi hasil) between the yayasan and the koperasi, the
//! validation that guards it, and the period aggregation of the inventory
//! transfer ledger. Pure functions, zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pesantren Ledger Data Flow                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               pesantren-db (rows in, summaries out)             │   │
//! │  │   kop_barang   transfer_inventaris   penjualan   LedgerService  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ already-fetched rows                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pesantren-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   validation ──► profit_sharing ──► aggregation                 │   │
//! │  │   (fail fast)    (per record)       (per period)                │   │
//! │  │                                                                 │   │
//! │  │   bagi_hasil: validated request + totals → net profit shares    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Row types (product ownership, transfers, asset sales)
//! - [`money`] - Integer rupiah amounts
//! - [`error`] - Validation and calculation errors
//! - [`validation`] - Bagi hasil request, net profit and split preconditions
//! - [`profit_sharing`] - Ownership split and condition split
//! - [`aggregation`] - Transfer period summary and sales totals
//! - [`bagi_hasil`] - Period net-profit sharing run
//!
//! ## Example Usage
//!
//! ```rust
//! use pesantren_core::{calculate_profit_sharing, summarize_transfers, Money};
//! use pesantren_core::types::{ProductOwnership, TransferRecord, TransferStatus};
//!
//! let sharing = calculate_profit_sharing(
//!     Money::from_rupiah(10_000),
//!     &ProductOwnership::yayasan(70),
//! ).unwrap();
//! assert_eq!(sharing.split.yayasan_share.rupiah(), 7_000);
//!
//! let summary = summarize_transfers(&[
//!     TransferRecord::new("koperasi", TransferStatus::Pending, 42, 5_000),
//! ]);
//! assert_eq!(summary.total_quantity, 42);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod bagi_hasil;
pub mod error;
pub mod money;
pub mod profit_sharing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregation::{
    summarize_asset_sales, summarize_sales, summarize_transfers, DestinationSummary,
    PeriodSummary, SalesSummary, StatusSummary,
};
pub use bagi_hasil::{calculate_bagi_hasil, BagiHasilResult, BagiHasilTotals, SaleLine};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use money::Money;
pub use profit_sharing::{
    calculate_condition_split, calculate_profit_sharing, unit_margin, ProfitSharing, ProfitSplit,
};
pub use types::*;
pub use validation::{
    validate_bagi_hasil_request, validate_laba_bersih, BagiHasilPeriod, BagiHasilRequest,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Transfer destinations the back office offers in its form.
///
/// Informational only: destinations are an open set and the aggregator
/// groups by whatever string a row carries.
pub const KNOWN_DESTINATIONS: &[&str] = &[
    "koperasi",
    "distribusi",
    "dapur",
    "asrama",
    "kantor",
    "lainnya",
];
