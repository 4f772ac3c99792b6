//! # Bagi Hasil Run
//!
//! Shares a period's net profit between yayasan and koperasi.
//!
//! ## Flow
//! ```text
//! BagiHasilRequest ──► validate_bagi_hasil_request ──► BagiHasilPeriod
//!                                                          │
//! sale lines ──► BagiHasilTotals::from_lines               │
//!                  total_penjualan, total_hpp              │
//!                          │                               │
//!                          ▼                               ▼
//!        laba_kotor  = total_penjualan − total_hpp
//!        laba_bersih = laba_kotor − round(biaya_operasional)
//!                          │
//!                          ▼
//!                 validate_laba_bersih (must be > 0)
//!                          │
//!                          ▼
//!        bagian_yayasan  = floor(laba_bersih × persentase_yayasan / 100)
//!        bagian_koperasi = laba_bersih − bagian_yayasan
//! ```
//!
//! The request is validated before anything else is computed, so a bad
//! request never yields a partial result.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{
    validate_bagi_hasil_request, validate_laba_bersih, BagiHasilPeriod, BagiHasilRequest,
};

// =============================================================================
// Inputs
// =============================================================================

/// One sold line for the period: what it sold for and what it cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    /// Total paid for the line.
    pub harga_total: Money,
    /// Purchase price per unit. Missing means no recorded cost.
    #[serde(default)]
    pub harga_beli: Option<Money>,
    /// Units sold.
    pub jumlah: i64,
}

/// Sales and cost-of-goods totals for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BagiHasilTotals {
    pub total_penjualan: Money,
    pub total_hpp: Money,
}

impl BagiHasilTotals {
    /// Sums sale lines: `total_hpp = Σ harga_beli × jumlah`.
    ///
    /// Unlike reporting folds this one feeds a payout, so overflow is an
    /// error rather than a clamp.
    pub fn from_lines(lines: &[SaleLine]) -> CoreResult<Self> {
        let mut totals = BagiHasilTotals::default();

        for line in lines {
            let hpp = line
                .harga_beli
                .unwrap_or_default()
                .checked_mul_quantity(line.jumlah)
                .ok_or(CoreError::AmountOverflow { context: "HPP" })?;

            totals.total_penjualan = totals
                .total_penjualan
                .checked_add(line.harga_total)
                .ok_or(CoreError::AmountOverflow { context: "total penjualan" })?;
            totals.total_hpp = totals
                .total_hpp
                .checked_add(hpp)
                .ok_or(CoreError::AmountOverflow { context: "total HPP" })?;
        }

        Ok(totals)
    }
}

// =============================================================================
// Result
// =============================================================================

/// Outcome of a bagi hasil run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BagiHasilResult {
    pub period: BagiHasilPeriod,
    pub total_penjualan: Money,
    pub total_hpp: Money,
    pub laba_kotor: Money,
    pub biaya_operasional: Money,
    pub laba_bersih: Money,
    pub bagian_yayasan: Money,
    pub bagian_koperasi: Money,
}

// =============================================================================
// Calculation
// =============================================================================

/// Runs bagi hasil for one period.
///
/// ## Errors
/// - Any request validation error (dates, percentages, operating cost)
/// - [`crate::ValidationError::LabaBersihNotPositive`] when the period made
///   no net profit
/// - [`CoreError::AmountOverflow`] if a total leaves the `i64` range
///
/// ## Example
/// ```rust
/// use pesantren_core::bagi_hasil::{calculate_bagi_hasil, BagiHasilTotals};
/// use pesantren_core::money::Money;
/// use pesantren_core::validation::BagiHasilRequest;
///
/// let request = BagiHasilRequest::new("2026-01-01", "2026-01-31", 100_000.0, 60.0, 40.0);
/// let totals = BagiHasilTotals {
///     total_penjualan: Money::from_rupiah(1_500_000),
///     total_hpp: Money::from_rupiah(1_000_000),
/// };
///
/// let result = calculate_bagi_hasil(&request, &totals).unwrap();
/// assert_eq!(result.laba_bersih.rupiah(), 400_000);
/// assert_eq!(result.bagian_yayasan.rupiah(), 240_000);
/// assert_eq!(result.bagian_koperasi.rupiah(), 160_000);
/// ```
pub fn calculate_bagi_hasil(
    request: &BagiHasilRequest,
    totals: &BagiHasilTotals,
) -> CoreResult<BagiHasilResult> {
    let period = validate_bagi_hasil_request(request)?;

    let laba_kotor = totals
        .total_penjualan
        .checked_sub(totals.total_hpp)
        .ok_or(CoreError::AmountOverflow { context: "laba kotor" })?;

    // Finite after validation; `as` saturates anything beyond i64.
    let biaya_operasional = Money::from_rupiah(period.biaya_operasional.round() as i64);

    let laba_bersih = laba_kotor
        .checked_sub(biaya_operasional)
        .ok_or(CoreError::AmountOverflow { context: "laba bersih" })?;

    validate_laba_bersih(laba_bersih.rupiah() as f64)?;

    let bagian_yayasan = yayasan_share(laba_bersih, period.persentase_yayasan);
    let bagian_koperasi = laba_bersih - bagian_yayasan;

    debug!(
        start = %period.start,
        end = %period.end,
        laba_bersih = laba_bersih.rupiah(),
        bagian_yayasan = bagian_yayasan.rupiah(),
        bagian_koperasi = bagian_koperasi.rupiah(),
        "Bagi hasil calculated"
    );

    Ok(BagiHasilResult {
        period,
        total_penjualan: totals.total_penjualan,
        total_hpp: totals.total_hpp,
        laba_kotor,
        biaya_operasional,
        laba_bersih,
        bagian_yayasan,
        bagian_koperasi,
    })
}

/// Floors `laba_bersih × persen / 100`.
///
/// Whole and hundredth percentages are computed in integer rupiah, so
/// profits past 2^53 keep every digit. Anything finer falls back to f64.
fn yayasan_share(laba_bersih: Money, persen: f64) -> Money {
    let basis_points = persen * 100.0;
    if basis_points.fract() == 0.0 && (0.0..=10_000.0).contains(&basis_points) {
        let scaled = (laba_bersih.rupiah() as i128 * basis_points as i128).div_euclid(10_000);
        // 0 <= basis_points <= 10_000 keeps |scaled| <= |laba_bersih|
        return Money::from_rupiah(scaled as i64);
    }

    let share = (laba_bersih.rupiah() as f64 * persen / 100.0).floor() as i64;
    Money::from_rupiah(share.clamp(0, laba_bersih.rupiah()))
}

// =============================================================================
// Unit Tests
// =============================================================================
