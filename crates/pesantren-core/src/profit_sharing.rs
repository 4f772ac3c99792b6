//! # Profit Sharing
//!
//! Splits a sale amount between the yayasan and the koperasi.
//!
//! Two splits exist and they round differently:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate_profit_sharing (by product ownership)                        │
//! │    koperasi stock  → 0% / 100%                                          │
//! │    yayasan stock   → p% / (100 - p)%                                    │
//! │    yayasan  = floor(amount × p / 100)                                   │
//! │    koperasi = amount − yayasan          ← shares ALWAYS sum to amount   │
//! │                                                                         │
//! │  calculate_condition_split (by item condition, damaged-goods liability) │
//! │    good     → 100% / 0%                                                 │
//! │    damaged  →  70% / 30%                                                │
//! │    each share = floor(amount × pct / 100) on its own                    │
//! │                                          ← up to Rp 1 may be lost       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rounding difference is observable and relied on; the two are not to
//! be merged.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{ItemCondition, OwnerType, ProductOwnership};
use crate::validation::{validate_profit_share_percent, validate_sale_amount};

/// Yayasan's share of a damaged item's sale, in percent.
pub const DAMAGED_YAYASAN_PERCENT: u8 = 70;

/// Koperasi's share of a damaged item's sale, in percent.
pub const DAMAGED_KOPERASI_PERCENT: u8 = 30;

// =============================================================================
// Results
// =============================================================================

/// How one sale divides between yayasan and koperasi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitSplit {
    /// The sale amount the split was computed from.
    pub total_sale: Money,
    pub yayasan_share: Money,
    pub koperasi_share: Money,
    /// Always `100 - koperasi_percent`.
    pub yayasan_percent: u8,
    pub koperasi_percent: u8,
}

impl ProfitSplit {
    /// Rupiah lost to independent flooring. Zero for ownership splits.
    pub fn truncation_loss(&self) -> Money {
        self.total_sale - self.yayasan_share - self.koperasi_share
    }
}

/// Result of [`calculate_profit_sharing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitSharing {
    pub split: ProfitSplit,

    /// The koperasi's realised margin on the sale. Equal to
    /// `split.koperasi_share`: purchase cost is not deducted here. For the
    /// per-unit price margin see [`unit_margin`].
    pub margin: Money,
}

// =============================================================================
// Ownership Split
// =============================================================================

/// Splits a sale by the product's ownership.
///
/// ## Errors
/// - [`ValidationError::NegativeAmount`] if `amount < 0`
/// - [`ValidationError::OwnerTypeMissing`] if the product has no owner type
/// - [`ValidationError::ProfitSharePercentOutOfRange`] for a yayasan product
///   whose percentage is outside 0..=100
///
/// A yayasan product with no percentage recorded shares 0%.
///
/// ## Example
/// ```rust
/// use pesantren_core::money::Money;
/// use pesantren_core::profit_sharing::calculate_profit_sharing;
/// use pesantren_core::types::ProductOwnership;
///
/// let result = calculate_profit_sharing(
///     Money::from_rupiah(10_500),
///     &ProductOwnership::yayasan(70),
/// ).unwrap();
///
/// assert_eq!(result.split.yayasan_share.rupiah(), 7_350);
/// assert_eq!(result.split.koperasi_share.rupiah(), 3_150);
/// assert_eq!(result.margin.rupiah(), 3_150);
/// ```
pub fn calculate_profit_sharing(
    amount: Money,
    product: &ProductOwnership,
) -> ValidationResult<ProfitSharing> {
    validate_sale_amount(amount)?;

    let owner_type = product.owner_type.ok_or(ValidationError::OwnerTypeMissing)?;

    let yayasan_percent = match owner_type {
        OwnerType::Koperasi => 0,
        OwnerType::Yayasan => {
            validate_profit_share_percent(product.profit_share_percent.unwrap_or(0))?
        }
    };

    let yayasan_share = amount.percent_floor(yayasan_percent);
    let koperasi_share = amount - yayasan_share;

    Ok(ProfitSharing {
        split: ProfitSplit {
            total_sale: amount,
            yayasan_share,
            koperasi_share,
            yayasan_percent,
            koperasi_percent: 100 - yayasan_percent,
        },
        margin: koperasi_share,
    })
}

// =============================================================================
// Condition Split
// =============================================================================

/// Splits a yayasan asset sale by the item's condition.
///
/// Good items go entirely to the yayasan. Damaged items are split 70/30 so
/// the koperasi carries part of the loss; both shares are floored on their
/// own, so their sum may fall short of `amount`.
///
/// ## Example
/// ```rust
/// use pesantren_core::money::Money;
/// use pesantren_core::profit_sharing::calculate_condition_split;
/// use pesantren_core::types::ItemCondition;
///
/// let split = calculate_condition_split(Money::from_rupiah(10_001), ItemCondition::Damaged).unwrap();
/// assert_eq!(split.yayasan_share.rupiah(), 7_000);
/// assert_eq!(split.koperasi_share.rupiah(), 3_000);
/// assert_eq!(split.truncation_loss().rupiah(), 1);
/// ```
pub fn calculate_condition_split(
    amount: Money,
    condition: ItemCondition,
) -> ValidationResult<ProfitSplit> {
    validate_sale_amount(amount)?;

    let (yayasan_percent, koperasi_percent) = match condition {
        ItemCondition::Good => (100, 0),
        ItemCondition::Damaged => (DAMAGED_YAYASAN_PERCENT, DAMAGED_KOPERASI_PERCENT),
    };

    Ok(ProfitSplit {
        total_sale: amount,
        yayasan_share: amount.percent_floor(yayasan_percent),
        koperasi_share: amount.percent_floor(koperasi_percent),
        yayasan_percent,
        koperasi_percent,
    })
}

// =============================================================================
// Price Margin
// =============================================================================

/// Per-unit margin: selling price minus purchase price.
///
/// Unrelated to [`ProfitSharing::margin`]; may be negative when an item is
/// sold below cost.
#[inline]
pub fn unit_margin(harga_jual: Money, harga_beli: Money) -> Money {
    harga_jual - harga_beli
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rp(n: i64) -> Money {
        Money::from_rupiah(n)
    }

    #[test]
    fn test_koperasi_keeps_everything() {
        let result = calculate_profit_sharing(rp(10_000), &ProductOwnership::koperasi()).unwrap();
        assert_eq!(result.split.yayasan_share, rp(0));
        assert_eq!(result.split.koperasi_share, rp(10_000));
        assert_eq!(result.split.yayasan_percent, 0);
        assert_eq!(result.split.koperasi_percent, 100);
        assert_eq!(result.split.total_sale, rp(10_000));
    }

    #[test]
    fn test_koperasi_ignores_recorded_percent() {
        let product = ProductOwnership {
            owner_type: Some(OwnerType::Koperasi),
            profit_share_percent: Some(70),
        };
        let result = calculate_profit_sharing(rp(10_000), &product).unwrap();
        assert_eq!(result.split.yayasan_share, rp(0));
    }

    #[test]
    fn test_yayasan_70_percent() {
        let result = calculate_profit_sharing(rp(10_000), &ProductOwnership::yayasan(70)).unwrap();
        assert_eq!(result.split.yayasan_share, rp(7_000));
        assert_eq!(result.split.koperasi_share, rp(3_000));
        assert_eq!(result.split.yayasan_percent, 70);
        assert_eq!(result.split.koperasi_percent, 30);
    }

    #[test]
    fn test_yayasan_share_sums_exactly() {
        let result = calculate_profit_sharing(rp(10_500), &ProductOwnership::yayasan(70)).unwrap();
        assert_eq!(result.split.yayasan_share, rp(7_350));
        assert_eq!(result.split.koperasi_share, rp(3_150));
        assert_eq!(
            result.split.yayasan_share + result.split.koperasi_share,
            rp(10_500)
        );

        // 999 × 33% = 329.67 → 329; koperasi takes the remaining 670
        let odd = calculate_profit_sharing(rp(999), &ProductOwnership::yayasan(33)).unwrap();
        assert_eq!(odd.split.yayasan_share, rp(329));
        assert_eq!(odd.split.koperasi_share, rp(670));
        assert!(odd.split.truncation_loss().is_zero());
    }

    #[test]
    fn test_margin_equals_koperasi_share() {
        let result = calculate_profit_sharing(rp(10_500), &ProductOwnership::yayasan(70)).unwrap();
        assert_eq!(result.margin, result.split.koperasi_share);
    }

    #[test]
    fn test_yayasan_without_percent_shares_nothing() {
        let product = ProductOwnership {
            owner_type: Some(OwnerType::Yayasan),
            profit_share_percent: None,
        };
        let result = calculate_profit_sharing(rp(8_000), &product).unwrap();
        assert_eq!(result.split.yayasan_share, rp(0));
        assert_eq!(result.split.koperasi_share, rp(8_000));
    }

    #[test]
    fn test_missing_owner_type_is_an_error() {
        let product = ProductOwnership {
            owner_type: None,
            profit_share_percent: Some(70),
        };
        assert_eq!(
            calculate_profit_sharing(rp(10_000), &product),
            Err(ValidationError::OwnerTypeMissing)
        );
    }

    #[test]
    fn test_negative_amount_is_an_error() {
        assert_eq!(
            calculate_profit_sharing(rp(-1), &ProductOwnership::koperasi()),
            Err(ValidationError::NegativeAmount)
        );
        assert_eq!(
            calculate_condition_split(rp(-1), ItemCondition::Good),
            Err(ValidationError::NegativeAmount)
        );
    }

    #[test]
    fn test_percent_out_of_range() {
        assert_eq!(
            calculate_profit_sharing(rp(10_000), &ProductOwnership::yayasan(101)),
            Err(ValidationError::ProfitSharePercentOutOfRange(101))
        );
    }

    #[test]
    fn test_zero_amount() {
        let result = calculate_profit_sharing(rp(0), &ProductOwnership::yayasan(70)).unwrap();
        assert!(result.split.yayasan_share.is_zero());
        assert!(result.split.koperasi_share.is_zero());
    }

    #[test]
    fn test_condition_good_goes_to_yayasan() {
        let split = calculate_condition_split(rp(12_345), ItemCondition::Good).unwrap();
        assert_eq!(split.yayasan_share, rp(12_345));
        assert_eq!(split.koperasi_share, rp(0));
        assert_eq!((split.yayasan_percent, split.koperasi_percent), (100, 0));
    }

    #[test]
    fn test_condition_damaged_70_30() {
        let split = calculate_condition_split(rp(10_000), ItemCondition::Damaged).unwrap();
        assert_eq!(split.yayasan_share, rp(7_000));
        assert_eq!(split.koperasi_share, rp(3_000));
        assert_eq!((split.yayasan_percent, split.koperasi_percent), (70, 30));
    }

    #[test]
    fn test_condition_damaged_keeps_truncation_loss() {
        // 7 × 70% = 4.9 → 4, 7 × 30% = 2.1 → 2; Rp 1 unassigned
        let split = calculate_condition_split(rp(7), ItemCondition::Damaged).unwrap();
        assert_eq!(split.yayasan_share, rp(4));
        assert_eq!(split.koperasi_share, rp(2));
        assert_eq!(split.truncation_loss(), rp(1));
    }

    #[test]
    fn test_unit_margin() {
        assert_eq!(unit_margin(rp(12_000), rp(9_500)), rp(2_500));
        assert_eq!(unit_margin(rp(9_000), rp(9_500)), rp(-500));
    }

    fn condition_strategy() -> impl Strategy<Value = ItemCondition> {
        prop_oneof![Just(ItemCondition::Good), Just(ItemCondition::Damaged)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Condition split never hands out more than the sale, and good
        /// items hand out exactly the sale to the yayasan.
        #[test]
        fn prop_condition_split_bounded(
            amount in 0i64..1_000_000_000_000,
            condition in condition_strategy(),
        ) {
            let split = calculate_condition_split(rp(amount), condition).unwrap();
            prop_assert!(split.yayasan_share + split.koperasi_share <= rp(amount));
            prop_assert!(!split.yayasan_share.is_negative());
            prop_assert!(!split.koperasi_share.is_negative());
            prop_assert_eq!(split.yayasan_percent + split.koperasi_percent, 100);
            if condition == ItemCondition::Good {
                prop_assert_eq!(split.yayasan_share, rp(amount));
                prop_assert_eq!(split.koperasi_share, rp(0));
            }
        }

        /// Same inputs, same outputs.
        #[test]
        fn prop_condition_split_deterministic(
            amount in 0i64..1_000_000_000_000,
            condition in condition_strategy(),
        ) {
            let first = calculate_condition_split(rp(amount), condition).unwrap();
            let second = calculate_condition_split(rp(amount), condition).unwrap();
            prop_assert_eq!(first, second);
        }

        /// The yayasan's fraction of the sale is the same whatever the
        /// amount, up to the one rupiah lost to flooring.
        #[test]
        fn prop_condition_split_scales_proportionally(
            a in 1_000i64..1_000_000_000,
            b in 1_000i64..1_000_000_000,
            condition in condition_strategy(),
        ) {
            let first = calculate_condition_split(rp(a), condition).unwrap();
            let second = calculate_condition_split(rp(b), condition).unwrap();
            let ratio_a = first.yayasan_share.rupiah() as f64 / a as f64;
            let ratio_b = second.yayasan_share.rupiah() as f64 / b as f64;
            prop_assert!((ratio_a - ratio_b).abs() < 1e-3);
        }

        /// Ownership split shares always add up to the sale.
        #[test]
        fn prop_ownership_split_conserves_amount(
            amount in 0i64..1_000_000_000_000,
            percent in 0i64..=100,
        ) {
            let result = calculate_profit_sharing(rp(amount), &ProductOwnership::yayasan(percent)).unwrap();
            prop_assert_eq!(result.split.yayasan_share + result.split.koperasi_share, rp(amount));
            prop_assert_eq!(result.split.yayasan_percent as i64, percent);
            prop_assert_eq!(result.split.yayasan_percent + result.split.koperasi_percent, 100);
        }
    }
}
