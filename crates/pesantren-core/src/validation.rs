//! # Validation Module
//!
//! Preconditions for bagi hasil runs and profit splits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form                                               │
//! │  ├── Required fields, number inputs                                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Dates parse, numbers finite                                       │
//! │  ├── Percentages ≤ 100 and summing to exactly 100                      │
//! │  └── Runs BEFORE any query or calculation (fail fast)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── CHECK constraints on owner_type, status, percentages              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pesantren_core::validation::{validate_bagi_hasil_request, BagiHasilRequest};
//!
//! let request = BagiHasilRequest::new("2026-01-01", "2026-01-31", 250_000.0, 60.0, 40.0);
//! let period = validate_bagi_hasil_request(&request).unwrap();
//! assert_eq!(period.persentase_yayasan + period.persentase_koperasi, 100.0);
//! ```

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

// =============================================================================
// Bagi Hasil Request
// =============================================================================

/// A bagi hasil request as submitted by the back office form.
///
/// Dates are raw strings and numbers are raw floats: this is the
/// unvalidated shape. [`validate_bagi_hasil_request`] turns it into a
/// [`BagiHasilPeriod`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BagiHasilRequest {
    #[serde(default)]
    pub periode_start: Option<String>,
    #[serde(default)]
    pub periode_end: Option<String>,
    /// Operating cost for the period, rupiah.
    #[serde(default)]
    pub biaya_operasional: f64,
    pub persentase_yayasan: f64,
    pub persentase_koperasi: f64,
}

impl BagiHasilRequest {
    /// Creates a request with both period dates set.
    pub fn new(
        periode_start: impl Into<String>,
        periode_end: impl Into<String>,
        biaya_operasional: f64,
        persentase_yayasan: f64,
        persentase_koperasi: f64,
    ) -> Self {
        BagiHasilRequest {
            periode_start: Some(periode_start.into()),
            periode_end: Some(periode_end.into()),
            biaya_operasional,
            persentase_yayasan,
            persentase_koperasi,
        }
    }
}

/// A request that passed [`validate_bagi_hasil_request`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BagiHasilPeriod {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
    pub biaya_operasional: f64,
    pub persentase_yayasan: f64,
    pub persentase_koperasi: f64,
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a bagi hasil request.
///
/// ## Rules (checked in this order)
/// 1. Both period dates present and non-blank
/// 2. Both dates parse (`YYYY-MM-DD`, or RFC 3339 whose date part is used)
/// 3. `biaya_operasional` is finite
/// 4. Both percentages are finite
/// 5. Neither percentage exceeds 100
/// 6. The percentages sum to exactly 100
///
/// Rule 6 is stricter than rule 5 but both are kept: 70 + 50 fails on the
/// total, 120 + -20 fails on the individual limit.
///
/// ## Example
/// ```rust
/// use pesantren_core::validation::{validate_bagi_hasil_request, BagiHasilRequest};
///
/// let bad = BagiHasilRequest::new("2026-01-01", "2026-01-31", 0.0, 70.0, 50.0);
/// let err = validate_bagi_hasil_request(&bad).unwrap_err();
/// assert_eq!(err.to_string(), "Total persentase bagi hasil harus 100%");
/// ```
pub fn validate_bagi_hasil_request(request: &BagiHasilRequest) -> ValidationResult<BagiHasilPeriod> {
    let (start, end) = match (
        non_blank(request.periode_start.as_deref()),
        non_blank(request.periode_end.as_deref()),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ValidationError::PeriodeRequired),
    };

    let start = parse_period_date(start)?;
    let end = parse_period_date(end)?;

    if !request.biaya_operasional.is_finite() {
        return Err(ValidationError::InvalidBiayaOperasional);
    }

    validate_persentase_pair(request.persentase_yayasan, request.persentase_koperasi)?;

    Ok(BagiHasilPeriod {
        start,
        end,
        biaya_operasional: request.biaya_operasional,
        persentase_yayasan: request.persentase_yayasan,
        persentase_koperasi: request.persentase_koperasi,
    })
}

/// Validates a yayasan / koperasi percentage pair (rules 4-6 above).
///
/// Also used on configured default percentages, which never pass through
/// a full request.
pub fn validate_persentase_pair(yayasan: f64, koperasi: f64) -> ValidationResult<()> {
    if !yayasan.is_finite() || !koperasi.is_finite() {
        return Err(ValidationError::InvalidPersentase);
    }

    if yayasan > 100.0 || koperasi > 100.0 {
        return Err(ValidationError::PersentaseOverLimit);
    }

    // Exact comparison: the total must be 100, not "close to" 100.
    if yayasan + koperasi != 100.0 {
        return Err(ValidationError::PersentaseTotalMismatch);
    }

    Ok(())
}

/// Validates the net profit of a period before it is shared.
///
/// ## Rules
/// - Must be finite
/// - Must be strictly positive; a loss or break-even has nothing to share
pub fn validate_laba_bersih(net_profit: f64) -> ValidationResult<()> {
    if !net_profit.is_finite() {
        return Err(ValidationError::InvalidLabaBersih);
    }

    if net_profit <= 0.0 {
        return Err(ValidationError::LabaBersihNotPositive);
    }

    Ok(())
}

// =============================================================================
// Split Preconditions
// =============================================================================

/// Validates a sale amount. Zero is allowed; negative is not.
pub fn validate_sale_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount);
    }

    Ok(())
}

/// Validates a product's yayasan profit share percentage and narrows it.
///
/// ## Example
/// ```rust
/// use pesantren_core::validation::validate_profit_share_percent;
///
/// assert_eq!(validate_profit_share_percent(70).unwrap(), 70u8);
/// assert!(validate_profit_share_percent(101).is_err());
/// assert!(validate_profit_share_percent(-1).is_err());
/// ```
pub fn validate_profit_share_percent(percent: i64) -> ValidationResult<u8> {
    if !(0..=100).contains(&percent) {
        return Err(ValidationError::ProfitSharePercentOutOfRange(percent));
    }

    Ok(percent as u8)
}

// =============================================================================
// Helpers
// =============================================================================

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses a period date. Timestamps are accepted because some form
/// widgets submit `2026-01-31T00:00:00Z`; only the date part is kept.
fn parse_period_date(value: &str) -> ValidationResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| ValidationError::InvalidDateFormat)
}

// =============================================================================
// Unit Tests
// =============================================================================
