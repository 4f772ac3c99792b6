//! # Repository Module
//!
//! One repository per ledger table. Repositories only move rows; split and
//! rounding rules live in pesantren-core.
//!
//! ```text
//! db.products()   ──► ProductRepository   ──► kop_barang
//! db.transfers()  ──► TransferRepository  ──► transfer_inventaris
//! db.sales()      ──► SaleRepository      ──► penjualan, v_penjualan_aset_yayasan
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Products and their ownership
//! - [`transfer::TransferRepository`] - Inventory transfers
//! - [`sale::SaleRepository`] - Sale lines and yayasan asset sales

pub mod product;
pub mod sale;
pub mod transfer;
