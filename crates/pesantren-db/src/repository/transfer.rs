//! # Transfer Repository
//!
//! Database operations for `transfer_inventaris`, the ledger of yayasan
//! stock moved to a destination.
//!
//! ## Transfer Lifecycle
//! ```text
//!   insert() ──► pending ──► approved ──► completed
//!                   │
//!                   └──────► rejected
//! ```
//!
//! Status changes are not policed here; the back office decides which
//! transitions it allows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pesantren_core::{ItemCondition, TransferRecord, TransferStatus};

// =============================================================================
// Entities
// =============================================================================

/// A row from `transfer_inventaris`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransferInventaris {
    pub id: String,
    pub nama_item: String,
    /// Destination label, e.g. `koperasi`, `dapur`.
    pub tujuan: String,
    pub status: TransferStatus,
    pub kondisi: ItemCondition,
    pub jumlah: Option<i64>,
    /// Reference cost per unit in rupiah.
    pub hpp: Option<i64>,
    pub tanggal_transfer: NaiveDate,
    pub catatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransferInventaris {
    /// The record pesantren-core aggregates.
    pub fn to_record(&self) -> TransferRecord {
        TransferRecord {
            destination: self.tujuan.clone(),
            status: self.status,
            quantity: self.jumlah,
            reference_cost: self.hpp,
            condition: self.kondisi,
        }
    }
}

/// Input for recording a new transfer. New transfers start `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransfer {
    pub nama_item: String,
    pub tujuan: String,
    #[serde(default)]
    pub kondisi: ItemCondition,
    pub jumlah: Option<i64>,
    pub hpp: Option<i64>,
    pub tanggal_transfer: NaiveDate,
    #[serde(default)]
    pub catatan: Option<String>,
}

impl NewTransfer {
    pub fn new(
        nama_item: impl Into<String>,
        tujuan: impl Into<String>,
        jumlah: i64,
        hpp: i64,
        tanggal_transfer: NaiveDate,
    ) -> Self {
        NewTransfer {
            nama_item: nama_item.into(),
            tujuan: tujuan.into(),
            kondisi: ItemCondition::Good,
            jumlah: Some(jumlah),
            hpp: Some(hpp),
            tanggal_transfer,
            catatan: None,
        }
    }

    pub fn kondisi(mut self, kondisi: ItemCondition) -> Self {
        self.kondisi = kondisi;
        self
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for `transfer_inventaris`.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    pool: SqlitePool,
}

impl TransferRepository {
    /// Creates a new TransferRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransferRepository { pool }
    }

    /// Records a transfer with status `pending`.
    ///
    /// ## Errors
    /// * `DbError::InvalidInput` - blank destination
    pub async fn insert(&self, transfer: &NewTransfer) -> DbResult<TransferInventaris> {
        if transfer.tujuan.trim().is_empty() {
            return Err(DbError::InvalidInput("Tujuan transfer harus diisi".to_string()));
        }

        let now = Utc::now();
        let row = TransferInventaris {
            id: Uuid::new_v4().to_string(),
            nama_item: transfer.nama_item.clone(),
            tujuan: transfer.tujuan.clone(),
            status: TransferStatus::Pending,
            kondisi: transfer.kondisi,
            jumlah: transfer.jumlah,
            hpp: transfer.hpp,
            tanggal_transfer: transfer.tanggal_transfer,
            catatan: transfer.catatan.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %row.id, tujuan = %row.tujuan, jumlah = ?row.jumlah, "Inserting transfer");

        sqlx::query(
            r#"
            INSERT INTO transfer_inventaris (
                id, nama_item, tujuan, status, kondisi, jumlah, hpp,
                tanggal_transfer, catatan, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&row.id)
        .bind(&row.nama_item)
        .bind(&row.tujuan)
        .bind(row.status)
        .bind(row.kondisi)
        .bind(row.jumlah)
        .bind(row.hpp)
        .bind(row.tanggal_transfer)
        .bind(&row.catatan)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(row)
    }

    /// Gets a transfer by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TransferInventaris>> {
        let row = sqlx::query_as::<_, TransferInventaris>(
            r#"
            SELECT id, nama_item, tujuan, status, kondisi, jumlah, hpp,
                   tanggal_transfer, catatan, created_at, updated_at
            FROM transfer_inventaris
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists transfers dated within `[start, end]` (inclusive), oldest first.
    ///
    /// Rows with the same date come back in insertion order, which keeps
    /// the first-seen grouping order of the period summary stable.
    pub async fn list_by_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<TransferInventaris>> {
        let rows = sqlx::query_as::<_, TransferInventaris>(
            r#"
            SELECT id, nama_item, tujuan, status, kondisi, jumlah, hpp,
                   tanggal_transfer, catatan, created_at, updated_at
            FROM transfer_inventaris
            WHERE tanggal_transfer BETWEEN ?1 AND ?2
            ORDER BY tanggal_transfer, rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(%start, %end, count = rows.len(), "Listed transfers for period");
        Ok(rows)
    }

    /// Sets a transfer's status.
    ///
    /// ## Returns
    /// * `Ok(())` - Updated
    /// * `Err(DbError::NotFound)` - No transfer with that id
    pub async fn update_status(&self, id: &str, status: TransferStatus) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transfer_inventaris
            SET status = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transfer", id));
        }

        info!(id = %id, status = %status, "Transfer status updated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
