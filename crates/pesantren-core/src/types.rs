//! # Domain Types
//!
//! Record types the ledger consumes. Rows come from the data layer already
//! fetched; these types are the single place their shape is pinned down.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │ ProductOwnership │  │  TransferRecord  │  │ AssetSaleRecord  │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  owner_type      │  │  destination     │  │  amount          │      │
//! │  │  profit_share_%  │  │  status          │  │  condition       │      │
//! │  │  (kop_barang)    │  │  quantity, hpp   │  │  (v_penjualan_   │      │
//! │  └──────────────────┘  │  condition       │  │   aset_yayasan)  │      │
//! │                        │ (transfer_       │  └──────────────────┘      │
//! │                        │  inventaris)     │                            │
//! │                        └──────────────────┘                            │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │    OwnerType     │  │  ItemCondition   │  │  TransferStatus  │      │
//! │  │  Koperasi        │  │  Good            │  │  Pending         │      │
//! │  │  Yayasan         │  │  Damaged         │  │  Approved        │      │
//! │  └──────────────────┘  └──────────────────┘  │  Rejected        │      │
//! │                                              │  Completed       │      │
//! │                                              └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Owner Type
// =============================================================================

/// Who originally owns a product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    /// Stock bought by the koperasi itself. All revenue stays there.
    Koperasi,
    /// Stock consigned by the yayasan. Revenue is split by the product's
    /// profit share percentage.
    Yayasan,
}

impl OwnerType {
    /// Lowercase name, identical to the stored and serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::Koperasi => "koperasi",
            OwnerType::Yayasan => "yayasan",
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Item Condition
// =============================================================================

/// Physical condition of a transferred or sold item.
///
/// Only matters for the liability split on damaged goods; see
/// [`crate::profit_sharing::calculate_condition_split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    #[default]
    Good,
    Damaged,
}

impl ItemCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::Good => "good",
            ItemCondition::Damaged => "damaged",
        }
    }
}

impl fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the English tags and the Indonesian labels used on inventory
/// forms (`baik`, `rusak`).
impl FromStr for ItemCondition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" | "baik" => Ok(ItemCondition::Good),
            "damaged" | "rusak" => Ok(ItemCondition::Damaged),
            _ => Err(ValidationError::InvalidCondition(s.to_string())),
        }
    }
}

// =============================================================================
// Transfer Status
// =============================================================================

/// Lifecycle of an inventory transfer.
///
/// The aggregator treats it as an opaque key; no ordering between states
/// is implied here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Approved => "approved",
            TransferStatus::Rejected => "rejected",
            TransferStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product Ownership
// =============================================================================

/// The ownership view of a `kop_barang` row.
///
/// `owner_type` is optional here only because rows can arrive without it;
/// the calculator rejects such rows instead of guessing an owner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductOwnership {
    /// Who owns the stock. `None` is a hard error at calculation time.
    pub owner_type: Option<OwnerType>,

    /// Yayasan's share in percent (0-100). Ignored for koperasi stock.
    pub profit_share_percent: Option<i64>,
}

impl ProductOwnership {
    /// Koperasi-owned stock.
    pub fn koperasi() -> Self {
        ProductOwnership {
            owner_type: Some(OwnerType::Koperasi),
            profit_share_percent: None,
        }
    }

    /// Yayasan-owned stock with the given profit share percentage.
    pub fn yayasan(profit_share_percent: i64) -> Self {
        ProductOwnership {
            owner_type: Some(OwnerType::Yayasan),
            profit_share_percent: Some(profit_share_percent),
        }
    }
}

// =============================================================================
// Transfer Record
// =============================================================================

/// One row of the inventory transfer ledger (`transfer_inventaris`).
///
/// Numeric fields are optional: incomplete upstream rows are still counted
/// by the aggregator, with the missing number read as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransferRecord {
    /// Where the stock went: koperasi, distribusi, dapur, asrama, kantor,
    /// lainnya, ... An open set, used verbatim as the grouping key.
    pub destination: String,

    pub status: TransferStatus,

    /// Units moved.
    #[serde(default)]
    pub quantity: Option<i64>,

    /// HPP per unit in rupiah. Rows from the reporting view call it `hpp`.
    #[serde(default)]
    #[serde(alias = "hpp")]
    pub reference_cost: Option<i64>,

    #[serde(default)]
    pub condition: ItemCondition,
}

impl TransferRecord {
    /// Creates a fully populated transfer record.
    pub fn new(
        destination: impl Into<String>,
        status: TransferStatus,
        quantity: i64,
        reference_cost: i64,
    ) -> Self {
        TransferRecord {
            destination: destination.into(),
            status,
            quantity: Some(quantity),
            reference_cost: Some(reference_cost),
            condition: ItemCondition::Good,
        }
    }

    /// Quantity, 0 when missing.
    #[inline]
    pub fn quantity_or_zero(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    /// HPP per unit, 0 when missing.
    #[inline]
    pub fn reference_cost_or_zero(&self) -> Money {
        Money::from_rupiah(self.reference_cost.unwrap_or(0))
    }
}

// =============================================================================
// Asset Sale Record
// =============================================================================

/// A sale of a yayasan asset (`v_penjualan_aset_yayasan`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssetSaleRecord {
    /// Sale amount in rupiah.
    pub amount: Money,

    #[serde(default)]
    pub condition: ItemCondition,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parsing() {
        assert_eq!("good".parse::<ItemCondition>().unwrap(), ItemCondition::Good);
        assert_eq!("Rusak".parse::<ItemCondition>().unwrap(), ItemCondition::Damaged);
        assert_eq!(" baik ".parse::<ItemCondition>().unwrap(), ItemCondition::Good);
        assert!("hilang".parse::<ItemCondition>().is_err());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&OwnerType::Yayasan).unwrap(),
            "\"yayasan\""
        );
        assert_eq!(
            serde_json::to_string(&TransferStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(TransferStatus::Approved.to_string(), "approved");
    }

    #[test]
    fn test_transfer_row_with_missing_numbers_decodes() {
        let row: TransferRecord =
            serde_json::from_str(r#"{"destination":"dapur","status":"pending"}"#).unwrap();

        assert_eq!(row.quantity, None);
        assert_eq!(row.reference_cost, None);
        assert_eq!(row.condition, ItemCondition::Good);
        assert_eq!(row.quantity_or_zero(), 0);
        assert!(row.reference_cost_or_zero().is_zero());
    }

    #[test]
    fn test_transfer_row_accepts_hpp_alias() {
        let row: TransferRecord = serde_json::from_str(
            r#"{"destination":"koperasi","status":"approved","quantity":3,"hpp":2500,"condition":"damaged"}"#,
        )
        .unwrap();

        assert_eq!(row.reference_cost, Some(2500));
        assert_eq!(row.condition, ItemCondition::Damaged);
    }

    #[test]
    fn test_transfer_binding_uses_field_name() {
        let decl = TransferRecord::decl();
        assert!(decl.contains("reference_cost"), "{decl}");
        assert!(!decl.contains("hpp"), "{decl}");
    }

    #[test]
    fn test_product_without_owner_decodes_as_none() {
        let product: ProductOwnership =
            serde_json::from_str(r#"{"owner_type":null,"profit_share_percent":70}"#).unwrap();
        assert_eq!(product.owner_type, None);
    }

    #[test]
    fn test_ownership_constructors() {
        assert_eq!(ProductOwnership::koperasi().owner_type, Some(OwnerType::Koperasi));
        let yayasan = ProductOwnership::yayasan(70);
        assert_eq!(yayasan.owner_type, Some(OwnerType::Yayasan));
        assert_eq!(yayasan.profit_share_percent, Some(70));
    }
}
