//! # Period Aggregation
//!
//! Folds ledger rows for a reporting period into summary buckets.
//!
//! ## Transfer Summary
//! ```text
//! rows (already filtered to the period by the caller)
//!   │
//!   ▼  single pass
//! ┌──────────────────────────────┐   ┌──────────────────────────┐
//! │ destination → quantity       │   │ status → count           │
//! │               transfers      │   │                          │
//! │               value (hpp×qty)│   │                          │
//! └──────────────────────────────┘   └──────────────────────────┘
//!   │                                   │
//!   ▼                                   ▼
//! by_destination[] (first-seen order)  by_status[] (first-seen order)
//! ```
//!
//! Reporting folds never fail. A row with a missing or zero quantity or HPP
//! is still a transfer: it counts, and contributes 0 to the sums.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationResult;
use crate::money::Money;
use crate::profit_sharing::{calculate_condition_split, ProfitSplit};
use crate::types::{AssetSaleRecord, TransferRecord, TransferStatus};

// =============================================================================
// Summary Types
// =============================================================================

/// Totals for one transfer destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DestinationSummary {
    pub destination: String,
    pub total_quantity: i64,
    pub total_transfers: u64,
    /// Σ hpp × quantity.
    pub total_value: Money,
}

/// Transfer count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusSummary {
    pub status: TransferStatus,
    pub count: u64,
}

/// Transfer ledger summary for a period.
///
/// ## Invariants
/// - Σ `by_destination[*].total_quantity` == `total_quantity`
/// - Σ `by_destination[*].total_transfers` == `total_transfers`
/// - Σ `by_status[*].count` == `total_transfers`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodSummary {
    pub total_transfers: u64,
    pub total_quantity: i64,
    pub by_destination: Vec<DestinationSummary>,
    pub by_status: Vec<StatusSummary>,
}

impl PeriodSummary {
    /// Looks up a destination bucket.
    pub fn destination(&self, destination: &str) -> Option<&DestinationSummary> {
        self.by_destination
            .iter()
            .find(|d| d.destination == destination)
    }

    /// Count for a status; 0 if no transfer had it.
    pub fn status_count(&self, status: TransferStatus) -> u64 {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }

    /// Σ hpp × quantity over every destination.
    pub fn total_value(&self) -> Money {
        self.by_destination
            .iter()
            .fold(Money::zero(), |acc, d| acc.saturating_add(d.total_value))
    }
}

// =============================================================================
// Transfer Fold
// =============================================================================

/// Summarises transfer rows.
///
/// ## Example
/// ```rust
/// use pesantren_core::aggregation::summarize_transfers;
/// use pesantren_core::types::{TransferRecord, TransferStatus};
///
/// let summary = summarize_transfers(&[
///     TransferRecord::new("koperasi", TransferStatus::Pending, 42, 5_000),
/// ]);
///
/// assert_eq!(summary.total_transfers, 1);
/// assert_eq!(summary.by_destination[0].total_value.rupiah(), 210_000);
/// ```
pub fn summarize_transfers(records: &[TransferRecord]) -> PeriodSummary {
    let mut destinations: Buckets<String, DestinationSummary> = Buckets::default();
    let mut statuses: Buckets<TransferStatus, StatusSummary> = Buckets::default();
    let mut total_quantity: i64 = 0;

    for record in records {
        let quantity = record.quantity_or_zero();
        let value = record.reference_cost_or_zero().saturating_mul_quantity(quantity);

        let bucket = destinations.entry(record.destination.clone(), || DestinationSummary {
            destination: record.destination.clone(),
            total_quantity: 0,
            total_transfers: 0,
            total_value: Money::zero(),
        });
        bucket.total_quantity = bucket.total_quantity.saturating_add(quantity);
        bucket.total_transfers += 1;
        bucket.total_value = bucket.total_value.saturating_add(value);

        statuses
            .entry(record.status, || StatusSummary {
                status: record.status,
                count: 0,
            })
            .count += 1;

        total_quantity = total_quantity.saturating_add(quantity);
    }

    PeriodSummary {
        total_transfers: records.len() as u64,
        total_quantity,
        by_destination: destinations.into_vec(),
        by_status: statuses.into_vec(),
    }
}

// =============================================================================
// Sales Fold
// =============================================================================

/// Sales totals over a set of profit splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_sales: u64,
    pub total_sale: Money,
    pub total_yayasan_share: Money,
    pub total_koperasi_share: Money,
    /// Rupiah assigned to neither side (condition splits only).
    pub truncation_loss: Money,
}

/// Folds profit splits into sales totals.
pub fn summarize_sales<'a>(splits: impl IntoIterator<Item = &'a ProfitSplit>) -> SalesSummary {
    splits
        .into_iter()
        .fold(SalesSummary::default(), |mut acc, split| {
            acc.total_sales += 1;
            acc.total_sale = acc.total_sale.saturating_add(split.total_sale);
            acc.total_yayasan_share = acc.total_yayasan_share.saturating_add(split.yayasan_share);
            acc.total_koperasi_share =
                acc.total_koperasi_share.saturating_add(split.koperasi_share);
            acc.truncation_loss = acc.truncation_loss.saturating_add(split.truncation_loss());
            acc
        })
}

/// Applies the condition split to every yayasan asset sale and folds the
/// results.
///
/// Unlike the transfer fold this is a transactional path: a negative sale
/// amount rejects the whole batch.
pub fn summarize_asset_sales(sales: &[AssetSaleRecord]) -> ValidationResult<SalesSummary> {
    let splits = sales
        .iter()
        .map(|sale| calculate_condition_split(sale.amount, sale.condition))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(summarize_sales(&splits))
}

// =============================================================================
// Ordered Buckets
// =============================================================================

/// Keyed accumulators that remember first-seen order, so summaries come out
/// the same way every time for the same rows.
struct Buckets<K, V> {
    index: HashMap<K, usize>,
    values: Vec<V>,
}

impl<K, V> Default for Buckets<K, V> {
    fn default() -> Self {
        Buckets {
            index: HashMap::new(),
            values: Vec::new(),
        }
    }
}

impl<K: Eq + Hash, V> Buckets<K, V> {
    fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let values = &mut self.values;
        let slot = *self.index.entry(key).or_insert_with(|| {
            values.push(init());
            values.len() - 1
        });
        &mut self.values[slot]
    }

    fn into_vec(self) -> Vec<V> {
        self.values
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemCondition;
    use proptest::prelude::*;

    fn rp(n: i64) -> Money {
        Money::from_rupiah(n)
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize_transfers(&[]);
        assert_eq!(summary.total_transfers, 0);
        assert_eq!(summary.total_quantity, 0);
        assert!(summary.by_destination.is_empty());
        assert!(summary.by_status.is_empty());
        assert_eq!(summary, PeriodSummary::default());
    }

    #[test]
    fn test_single_koperasi_record() {
        let summary = summarize_transfers(&[TransferRecord::new(
            "koperasi",
            TransferStatus::Pending,
            42,
            5_000,
        )]);

        assert_eq!(
            summary.by_destination,
            vec![DestinationSummary {
                destination: "koperasi".to_string(),
                total_quantity: 42,
                total_transfers: 1,
                total_value: rp(210_000),
            }]
        );
        assert_eq!(
            summary.by_status,
            vec![StatusSummary {
                status: TransferStatus::Pending,
                count: 1,
            }]
        );
        assert_eq!(summary.total_quantity, 42);
    }

    #[test]
    fn test_many_records_same_destination() {
        let records = vec![
            TransferRecord::new("dapur", TransferStatus::Approved, 10, 1_000),
            TransferRecord::new("dapur", TransferStatus::Completed, 5, 2_000),
            TransferRecord::new("dapur", TransferStatus::Approved, 1, 0),
        ];
        let summary = summarize_transfers(&records);

        assert_eq!(summary.total_transfers, 3);
        assert_eq!(summary.by_destination.len(), 1);
        let dapur = summary.destination("dapur").unwrap();
        assert_eq!(dapur.total_quantity, 16);
        assert_eq!(dapur.total_transfers, 3);
        assert_eq!(dapur.total_value, rp(20_000));
        assert_eq!(summary.status_count(TransferStatus::Approved), 2);
        assert_eq!(summary.status_count(TransferStatus::Completed), 1);
        assert_eq!(summary.status_count(TransferStatus::Rejected), 0);
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![
            TransferRecord::new("asrama", TransferStatus::Rejected, 1, 1),
            TransferRecord::new("koperasi", TransferStatus::Pending, 1, 1),
            TransferRecord::new("asrama", TransferStatus::Pending, 1, 1),
            TransferRecord::new("kantor", TransferStatus::Completed, 1, 1),
        ];
        let summary = summarize_transfers(&records);

        let destinations: Vec<&str> = summary
            .by_destination
            .iter()
            .map(|d| d.destination.as_str())
            .collect();
        assert_eq!(destinations, vec!["asrama", "koperasi", "kantor"]);

        let statuses: Vec<TransferStatus> = summary.by_status.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                TransferStatus::Rejected,
                TransferStatus::Pending,
                TransferStatus::Completed
            ]
        );
    }

    #[test]
    fn test_missing_and_zero_numbers_are_counted() {
        let records: Vec<TransferRecord> = serde_json::from_str(
            r#"[
                {"destination":"distribusi","status":"pending"},
                {"destination":"distribusi","status":"pending","quantity":0,"hpp":7000},
                {"destination":"lainnya","status":"completed","quantity":4}
            ]"#,
        )
        .unwrap();
        let summary = summarize_transfers(&records);

        assert_eq!(summary.total_transfers, 3);
        assert_eq!(summary.total_quantity, 4);
        assert_eq!(summary.destination("distribusi").unwrap().total_transfers, 2);
        assert_eq!(summary.destination("distribusi").unwrap().total_value, rp(0));
        assert_eq!(summary.destination("lainnya").unwrap().total_value, rp(0));
        assert_eq!(summary.total_value(), rp(0));
    }

    #[test]
    fn test_summarize_sales_totals() {
        let splits = vec![
            calculate_condition_split(rp(10_000), ItemCondition::Good).unwrap(),
            calculate_condition_split(rp(7), ItemCondition::Damaged).unwrap(),
        ];
        let summary = summarize_sales(&splits);

        assert_eq!(summary.total_sales, 2);
        assert_eq!(summary.total_sale, rp(10_007));
        assert_eq!(summary.total_yayasan_share, rp(10_004));
        assert_eq!(summary.total_koperasi_share, rp(2));
        assert_eq!(summary.truncation_loss, rp(1));
    }

    #[test]
    fn test_summarize_asset_sales() {
        let sales = vec![
            AssetSaleRecord {
                amount: rp(20_000),
                condition: ItemCondition::Damaged,
            },
            AssetSaleRecord {
                amount: rp(5_000),
                condition: ItemCondition::Good,
            },
        ];
        let summary = summarize_asset_sales(&sales).unwrap();

        assert_eq!(summary.total_yayasan_share, rp(19_000));
        assert_eq!(summary.total_koperasi_share, rp(6_000));
        assert!(summary.truncation_loss.is_zero());
    }

    #[test]
    fn test_summarize_asset_sales_rejects_negative() {
        let sales = vec![AssetSaleRecord {
            amount: rp(-10),
            condition: ItemCondition::Good,
        }];
        assert!(summarize_asset_sales(&sales).is_err());
    }

    fn status_strategy() -> impl Strategy<Value = TransferStatus> {
        prop_oneof![
            Just(TransferStatus::Pending),
            Just(TransferStatus::Approved),
            Just(TransferStatus::Rejected),
            Just(TransferStatus::Completed),
        ]
    }

    fn record_strategy() -> impl Strategy<Value = TransferRecord> {
        (
            prop_oneof![
                Just("koperasi"),
                Just("distribusi"),
                Just("dapur"),
                Just("asrama"),
                Just("kantor"),
                Just("lainnya"),
            ],
            status_strategy(),
            proptest::option::of(0i64..10_000),
            proptest::option::of(0i64..1_000_000),
        )
            .prop_map(|(destination, status, quantity, reference_cost)| TransferRecord {
                destination: destination.to_string(),
                status,
                quantity,
                reference_cost,
                condition: ItemCondition::Good,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Part sums equal the whole, for any list of rows.
        #[test]
        fn prop_transfer_summary_conserves_totals(
            records in proptest::collection::vec(record_strategy(), 0..60),
        ) {
            let summary = summarize_transfers(&records);

            let quantity: i64 = summary.by_destination.iter().map(|d| d.total_quantity).sum();
            let transfers: u64 = summary.by_destination.iter().map(|d| d.total_transfers).sum();
            let statuses: u64 = summary.by_status.iter().map(|s| s.count).sum();

            prop_assert_eq!(quantity, summary.total_quantity);
            prop_assert_eq!(transfers, summary.total_transfers);
            prop_assert_eq!(statuses, summary.total_transfers);
            prop_assert_eq!(summary.total_transfers, records.len() as u64);
        }

        /// Folding the same rows twice gives the same summary, order included.
        #[test]
        fn prop_transfer_summary_deterministic(
            records in proptest::collection::vec(record_strategy(), 0..30),
        ) {
            prop_assert_eq!(summarize_transfers(&records), summarize_transfers(&records));
        }
    }
}
