//! # Product Repository
//!
//! Database operations for `kop_barang`, the koperasi's product list.
//!
//! ## Ownership Columns
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kop_barang row                         ProductOwnership (core)         │
//! │  ─────────────────────                  ──────────────────────────      │
//! │  owner_type = 'koperasi'          ──►   Koperasi, percent ignored       │
//! │  owner_type = 'yayasan'           ──►   Yayasan, persentase_bagi_hasil  │
//! │  owner_type = NULL                ──►   None → OwnerTypeMissing at      │
//! │                                          profit-sharing time            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pesantren_core::{unit_margin, Money, OwnerType, ProductOwnership};

// =============================================================================
// Entity
// =============================================================================

/// A product row from `kop_barang`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Barang {
    pub id: String,
    /// Unique product code.
    pub kode_barang: String,
    pub nama_barang: String,
    pub owner_type: Option<OwnerType>,
    /// Yayasan's share of each sale, 0-100. Only read for yayasan products.
    pub persentase_bagi_hasil: Option<i64>,
    /// Selling price per unit in rupiah.
    pub harga_jual: i64,
    /// Purchase price per unit in rupiah.
    pub harga_beli: Option<i64>,
    pub stok: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Barang {
    /// Builds a new product with a fresh id and timestamps.
    pub fn new(
        kode_barang: impl Into<String>,
        nama_barang: impl Into<String>,
        ownership: ProductOwnership,
        harga_jual: i64,
        harga_beli: Option<i64>,
    ) -> Self {
        let now = Utc::now();
        Barang {
            id: generate_barang_id(),
            kode_barang: kode_barang.into(),
            nama_barang: nama_barang.into(),
            owner_type: ownership.owner_type,
            persentase_bagi_hasil: ownership.profit_share_percent,
            harga_jual,
            harga_beli,
            stok: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the opening stock.
    pub fn with_stok(mut self, stok: i64) -> Self {
        self.stok = stok;
        self
    }

    /// The ownership view pesantren-core splits on.
    pub fn ownership(&self) -> ProductOwnership {
        ProductOwnership {
            owner_type: self.owner_type,
            profit_share_percent: self.persentase_bagi_hasil,
        }
    }

    /// `harga_jual − harga_beli` per unit, `None` without a purchase price.
    pub fn unit_margin(&self) -> Option<Money> {
        self.harga_beli.map(|beli| {
            unit_margin(Money::from_rupiah(self.harga_jual), Money::from_rupiah(beli))
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for `kop_barang`.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let barang = repo.insert(&Barang::new("KB-001", "Sabun", ProductOwnership::koperasi(), 5_000, Some(3_500))).await?;
/// let yayasan_items = repo.list_by_owner(OwnerType::Yayasan).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const SELECT_BARANG: &str = r#"
    SELECT
        id, kode_barang, nama_barang, owner_type, persentase_bagi_hasil,
        harga_jual, harga_beli, stok, created_at, updated_at
    FROM kop_barang
"#;

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product.
    ///
    /// ## Returns
    /// * `Ok(Barang)` - The stored row
    /// * `Err(DbError::UniqueViolation)` - `kode_barang` already exists
    pub async fn insert(&self, barang: &Barang) -> DbResult<Barang> {
        debug!(kode_barang = %barang.kode_barang, owner_type = ?barang.owner_type, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO kop_barang (
                id, kode_barang, nama_barang, owner_type, persentase_bagi_hasil,
                harga_jual, harga_beli, stok, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&barang.id)
        .bind(&barang.kode_barang)
        .bind(&barang.nama_barang)
        .bind(barang.owner_type)
        .bind(barang.persentase_bagi_hasil)
        .bind(barang.harga_jual)
        .bind(barang.harga_beli)
        .bind(barang.stok)
        .bind(barang.created_at)
        .bind(barang.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &barang.kode_barang),
            other => other,
        })?;

        Ok(barang.clone())
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Barang))` - Product found
    /// * `Ok(None)` - No such product
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Barang>> {
        let barang = sqlx::query_as::<_, Barang>(&format!("{SELECT_BARANG} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(barang)
    }

    /// Lists products with the given owner, ordered by `kode_barang`.
    pub async fn list_by_owner(&self, owner_type: OwnerType) -> DbResult<Vec<Barang>> {
        let rows = sqlx::query_as::<_, Barang>(&format!(
            "{SELECT_BARANG} WHERE owner_type = ?1 ORDER BY kode_barang"
        ))
        .bind(owner_type)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner_type = %owner_type, count = rows.len(), "Listed products by owner");
        Ok(rows)
    }

    /// Counts all products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kop_barang")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new product id.
pub fn generate_barang_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
