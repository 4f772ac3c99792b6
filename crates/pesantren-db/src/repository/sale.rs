//! # Sale Repository
//!
//! Database operations for `penjualan` and the `v_penjualan_aset_yayasan`
//! view.
//!
//! ## Read Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  penjualan ⋈ kop_barang                                                 │
//! │       │                                                                 │
//! │       ├──► list_lines_by_period         → Vec<SaleLine>     (bagi hasil)│
//! │       ├──► list_product_sales_by_period → Vec<ProductSale>  (ownership) │
//! │       │                                                                 │
//! │  v_penjualan_aset_yayasan                                               │
//! │       └──► list_asset_sales_by_period   → Vec<AssetSaleRecord> (kondisi)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every period filter is inclusive on both ends.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pesantren_core::validation::validate_sale_amount;
use pesantren_core::{
    AssetSaleRecord, ItemCondition, Money, OwnerType, ProductOwnership, SaleLine,
};

// =============================================================================
// Entities
// =============================================================================

/// A row from `penjualan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Penjualan {
    pub id: String,
    pub barang_id: String,
    pub jumlah: i64,
    /// Total paid for the line in rupiah.
    pub harga_total: i64,
    pub kondisi: ItemCondition,
    pub tanggal: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a sale line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPenjualan {
    pub barang_id: String,
    pub jumlah: i64,
    pub harga_total: i64,
    #[serde(default)]
    pub kondisi: ItemCondition,
    pub tanggal: NaiveDate,
}

impl NewPenjualan {
    pub fn new(barang_id: impl Into<String>, jumlah: i64, harga_total: i64, tanggal: NaiveDate) -> Self {
        NewPenjualan {
            barang_id: barang_id.into(),
            jumlah,
            harga_total,
            kondisi: ItemCondition::Good,
            tanggal,
        }
    }

    pub fn kondisi(mut self, kondisi: ItemCondition) -> Self {
        self.kondisi = kondisi;
        self
    }
}

/// A sale amount together with the sold product's ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSale {
    pub amount: Money,
    pub ownership: ProductOwnership,
}

// =============================================================================
// Row Shapes
// =============================================================================

#[derive(sqlx::FromRow)]
struct SaleLineRow {
    harga_total: i64,
    harga_beli: Option<i64>,
    jumlah: i64,
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        SaleLine {
            harga_total: Money::from_rupiah(row.harga_total),
            harga_beli: row.harga_beli.map(Money::from_rupiah),
            jumlah: row.jumlah,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AssetSaleRow {
    harga_total: i64,
    kondisi: ItemCondition,
}

impl From<AssetSaleRow> for AssetSaleRecord {
    fn from(row: AssetSaleRow) -> Self {
        AssetSaleRecord {
            amount: Money::from_rupiah(row.harga_total),
            condition: row.kondisi,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductSaleRow {
    harga_total: i64,
    owner_type: Option<OwnerType>,
    persentase_bagi_hasil: Option<i64>,
}

impl From<ProductSaleRow> for ProductSale {
    fn from(row: ProductSaleRow) -> Self {
        ProductSale {
            amount: Money::from_rupiah(row.harga_total),
            ownership: ProductOwnership {
                owner_type: row.owner_type,
                profit_share_percent: row.persentase_bagi_hasil,
            },
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale lines.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale line.
    ///
    /// ## Errors
    /// * `DbError::Core` - negative `harga_total`
    /// * `DbError::InvalidInput` - `jumlah` not positive
    /// * `DbError::ForeignKeyViolation` - unknown `barang_id`
    pub async fn insert(&self, sale: &NewPenjualan) -> DbResult<Penjualan> {
        validate_sale_amount(Money::from_rupiah(sale.harga_total))?;
        if sale.jumlah <= 0 {
            return Err(DbError::InvalidInput(format!(
                "Jumlah penjualan harus lebih dari 0, didapat {}",
                sale.jumlah
            )));
        }

        let row = Penjualan {
            id: Uuid::new_v4().to_string(),
            barang_id: sale.barang_id.clone(),
            jumlah: sale.jumlah,
            harga_total: sale.harga_total,
            kondisi: sale.kondisi,
            tanggal: sale.tanggal,
            created_at: Utc::now(),
        };

        debug!(id = %row.id, barang_id = %row.barang_id, harga_total = row.harga_total, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO penjualan (id, barang_id, jumlah, harga_total, kondisi, tanggal, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&row.id)
        .bind(&row.barang_id)
        .bind(row.jumlah)
        .bind(row.harga_total)
        .bind(row.kondisi)
        .bind(row.tanggal)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(row)
    }

    /// Sale lines in the period with each product's purchase price, for
    /// the bagi hasil totals.
    pub async fn list_lines_by_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<SaleLine>> {
        let rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT p.harga_total, b.harga_beli, p.jumlah
            FROM penjualan p
            JOIN kop_barang b ON b.id = p.barang_id
            WHERE p.tanggal BETWEEN ?1 AND ?2
            ORDER BY p.tanggal, p.rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(%start, %end, count = rows.len(), "Listed sale lines for period");
        Ok(rows.into_iter().map(SaleLine::from).collect())
    }

    /// Sales of yayasan-owned products in the period.
    pub async fn list_asset_sales_by_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<AssetSaleRecord>> {
        let rows = sqlx::query_as::<_, AssetSaleRow>(
            r#"
            SELECT harga_total, kondisi
            FROM v_penjualan_aset_yayasan
            WHERE tanggal BETWEEN ?1 AND ?2
            ORDER BY tanggal
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(%start, %end, count = rows.len(), "Listed asset sales for period");
        Ok(rows.into_iter().map(AssetSaleRecord::from).collect())
    }

    /// Every sale in the period with the sold product's ownership.
    pub async fn list_product_sales_by_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<ProductSale>> {
        let rows = sqlx::query_as::<_, ProductSaleRow>(
            r#"
            SELECT p.harga_total, b.owner_type, b.persentase_bagi_hasil
            FROM penjualan p
            JOIN kop_barang b ON b.id = p.barang_id
            WHERE p.tanggal BETWEEN ?1 AND ?2
            ORDER BY p.tanggal, p.rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(%start, %end, count = rows.len(), "Listed product sales for period");
        Ok(rows.into_iter().map(ProductSale::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::Barang;
    use pesantren_core::ValidationError;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn setup() -> (Database, Barang, Barang) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let koperasi = Barang::new("KB-001", "Sabun", ProductOwnership::koperasi(), 5_000, Some(3_000));
        let yayasan = Barang::new("YY-001", "Kitab", ProductOwnership::yayasan(70), 40_000, Some(25_000));
        db.products().insert(&koperasi).await.unwrap();
        db.products().insert(&yayasan).await.unwrap();
        (db, koperasi, yayasan)
    }

    #[tokio::test]
    async fn test_lines_carry_purchase_price() {
        let (db, koperasi, yayasan) = setup().await;
        let sales = db.sales();
        sales
            .insert(&NewPenjualan::new(&koperasi.id, 3, 15_000, date("2026-04-02")))
            .await
            .unwrap();
        sales
            .insert(&NewPenjualan::new(&yayasan.id, 1, 40_000, date("2026-04-03")))
            .await
            .unwrap();

        let lines = sales
            .list_lines_by_period(date("2026-04-01"), date("2026-04-30"))
            .await
            .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].harga_total, Money::from_rupiah(15_000));
        assert_eq!(lines[0].harga_beli, Some(Money::from_rupiah(3_000)));
        assert_eq!(lines[0].jumlah, 3);
    }

    #[tokio::test]
    async fn test_asset_view_only_has_yayasan_sales() {
        let (db, koperasi, yayasan) = setup().await;
        let sales = db.sales();
        sales
            .insert(&NewPenjualan::new(&koperasi.id, 1, 5_000, date("2026-04-02")))
            .await
            .unwrap();
        sales
            .insert(
                &NewPenjualan::new(&yayasan.id, 1, 10_000, date("2026-04-02"))
                    .kondisi(ItemCondition::Damaged),
            )
            .await
            .unwrap();

        let assets = sales
            .list_asset_sales_by_period(date("2026-04-01"), date("2026-04-30"))
            .await
            .unwrap();

        assert_eq!(
            assets,
            vec![AssetSaleRecord {
                amount: Money::from_rupiah(10_000),
                condition: ItemCondition::Damaged,
            }]
        );
    }

    #[tokio::test]
    async fn test_product_sales_carry_ownership() {
        let (db, _, yayasan) = setup().await;
        db.sales()
            .insert(&NewPenjualan::new(&yayasan.id, 2, 80_000, date("2026-04-05")))
            .await
            .unwrap();

        let sales = db
            .sales()
            .list_product_sales_by_period(date("2026-04-05"), date("2026-04-05"))
            .await
            .unwrap();

        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].amount, Money::from_rupiah(80_000));
        assert_eq!(sales[0].ownership, ProductOwnership::yayasan(70));
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_amount() {
        let (db, koperasi, _) = setup().await;
        let err = db
            .sales()
            .insert(&NewPenjualan::new(&koperasi.id, 1, -1, date("2026-04-02")))
            .await
            .unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::NegativeAmount));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_product() {
        let (db, _, _) = setup().await;
        let err = db
            .sales()
            .insert(&NewPenjualan::new("missing", 1, 1_000, date("2026-04-02")))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
