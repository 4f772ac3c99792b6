//! # Ledger Service
//!
//! Joins the repositories with pesantren-core: fetch a period's rows, hand
//! them to the pure calculators, return the summary.
//!
//! ## Bagi Hasil Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  run_bagi_hasil(request)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_bagi_hasil_request ──✗──► DbError::Core(Validation(..))       │
//! │       │ ✓ BagiHasilPeriod            (no query has run yet)            │
//! │       ▼                                                                 │
//! │  sales().list_lines_by_period(start, end)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BagiHasilTotals::from_lines ──► calculate_bagi_hasil                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BagiHasilResult                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use pesantren_core::{
    calculate_bagi_hasil, calculate_profit_sharing, summarize_asset_sales, summarize_sales,
    summarize_transfers, validate_bagi_hasil_request, BagiHasilRequest, BagiHasilResult,
    BagiHasilTotals, PeriodSummary, SalesSummary, TransferRecord, ValidationResult,
};

/// Period reports and bagi hasil runs over the ledger tables.
#[derive(Debug, Clone)]
pub struct LedgerService {
    db: Database,
}

impl LedgerService {
    pub fn new(db: Database) -> Self {
        LedgerService { db }
    }

    /// Transfer totals for `[start, end]`, grouped by destination and by
    /// status.
    ///
    /// Rows without a quantity or reference cost count as 0; this never
    /// fails on row content.
    pub async fn period_summary(&self, start: NaiveDate, end: NaiveDate) -> DbResult<PeriodSummary> {
        let rows = self.db.transfers().list_by_period(start, end).await?;
        let records: Vec<TransferRecord> = rows.iter().map(|row| row.to_record()).collect();

        let summary = summarize_transfers(&records);

        info!(
            %start,
            %end,
            total_transfers = summary.total_transfers,
            total_quantity = summary.total_quantity,
            destinations = summary.by_destination.len(),
            "Transfer period summary"
        );
        Ok(summary)
    }

    /// Condition split of every yayasan asset sale in `[start, end]`.
    pub async fn asset_sales_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<SalesSummary> {
        let sales = self.db.sales().list_asset_sales_by_period(start, end).await?;
        let summary = summarize_asset_sales(&sales)?;

        info!(
            %start,
            %end,
            total_sales = summary.total_sales,
            yayasan = summary.total_yayasan_share.rupiah(),
            koperasi = summary.total_koperasi_share.rupiah(),
            "Asset sales summary"
        );
        Ok(summary)
    }

    /// Ownership split of every sale in `[start, end]`.
    ///
    /// ## Errors
    /// A product without `owner_type` or with an out-of-range percentage
    /// rejects the whole period.
    pub async fn koperasi_sales_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<SalesSummary> {
        let sales = self.db.sales().list_product_sales_by_period(start, end).await?;

        let splits = sales
            .iter()
            .map(|sale| calculate_profit_sharing(sale.amount, &sale.ownership).map(|s| s.split))
            .collect::<ValidationResult<Vec<_>>>()?;

        let summary = summarize_sales(&splits);

        info!(
            %start,
            %end,
            total_sales = summary.total_sales,
            yayasan = summary.total_yayasan_share.rupiah(),
            koperasi = summary.total_koperasi_share.rupiah(),
            "Koperasi sales summary"
        );
        Ok(summary)
    }

    /// Runs bagi hasil for the request's period.
    ///
    /// The request is validated before the database is touched.
    pub async fn run_bagi_hasil(&self, request: &BagiHasilRequest) -> DbResult<BagiHasilResult> {
        let period = validate_bagi_hasil_request(request)?;

        let lines = self
            .db
            .sales()
            .list_lines_by_period(period.start, period.end)
            .await?;
        debug!(lines = lines.len(), "Sale lines loaded for bagi hasil");

        let totals = BagiHasilTotals::from_lines(&lines)?;
        let result = calculate_bagi_hasil(request, &totals)?;

        info!(
            start = %period.start,
            end = %period.end,
            laba_bersih = result.laba_bersih.rupiah(),
            bagian_yayasan = result.bagian_yayasan.rupiah(),
            bagian_koperasi = result.bagian_koperasi.rupiah(),
            "Bagi hasil run complete"
        );
        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
