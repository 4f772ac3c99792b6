//! # Error Types
//!
//! Domain-specific error types for pesantren-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pesantren-core errors (this file)                                     │
//! │  ├── ValidationError  - Request shape / precondition failures          │
//! │  └── CoreError        - Everything a calculation run can fail with     │
//! │                                                                         │
//! │  pesantren-db errors (separate crate)                                  │
//! │  └── DbError          - Database and configuration failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stable Messages
//! The `Display` text of every [`ValidationError`] is shown verbatim to
//! back-office staff and asserted on by callers, so the Indonesian wording
//! is part of the contract. Do not reword a message without updating every
//! caller that matches on it.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation and precondition failures.
///
/// Raised before any calculation runs. A request that fails validation has
/// produced no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// `periode_start` or `periode_end` is missing or blank.
    #[error("Periode start dan end harus diisi")]
    PeriodeRequired,

    /// A period date does not parse as a calendar date.
    #[error("Format tanggal tidak valid")]
    InvalidDateFormat,

    /// Operating cost is NaN or infinite.
    #[error("Biaya operasional harus berupa angka yang valid")]
    InvalidBiayaOperasional,

    /// A bagi hasil percentage is NaN or infinite.
    #[error("Persentase harus berupa angka yang valid")]
    InvalidPersentase,

    /// A single bagi hasil percentage exceeds 100.
    #[error("Persentase tidak boleh lebih dari 100%")]
    PersentaseOverLimit,

    /// Yayasan and koperasi percentages do not add up to exactly 100.
    #[error("Total persentase bagi hasil harus 100%")]
    PersentaseTotalMismatch,

    /// Net profit is NaN or infinite.
    #[error("Laba bersih tidak valid")]
    InvalidLabaBersih,

    /// Net profit is zero or negative; there is nothing to share.
    #[error("Laba bersih harus lebih dari 0")]
    LabaBersihNotPositive,

    /// Sale amount below zero.
    #[error("Jumlah penjualan tidak boleh negatif")]
    NegativeAmount,

    /// Product row has no owner type. Never defaulted.
    #[error("Tipe pemilik barang harus diisi")]
    OwnerTypeMissing,

    /// Product profit share percentage outside 0..=100.
    #[error("Persentase bagi hasil barang harus antara 0 dan 100, didapat {0}")]
    ProfitSharePercentOutOfRange(i64),

    /// Condition label that is neither good/baik nor damaged/rusak.
    #[error("Kondisi barang tidak dikenal: {0}")]
    InvalidCondition(String),
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors from multi-step calculation runs (bagi hasil, period totals).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError). Displays the inner message
    /// unchanged so callers see the same stable text.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A monetary total left the `i64` range.
    #[error("Nilai {context} melebihi batas perhitungan")]
    AmountOverflow { context: &'static str },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation and split operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
