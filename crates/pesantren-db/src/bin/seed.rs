//! # Seed Data Generator
//!
//! Fills a ledger database with a month of development data and prints the
//! resulting reports.
//!
//! ## Usage
//! ```bash
//! cargo run -p pesantren-db --bin seed -- --db ./pesantren_dev.db
//! ```
//!
//! ## Generated Data
//! - Koperasi and yayasan products (`kop_barang`)
//! - Transfers to every known destination (`transfer_inventaris`)
//! - Sale lines, some of damaged yayasan stock (`penjualan`)
//!
//! All rows are dated in the current month up to today.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pesantren_core::{ItemCondition, ProductOwnership, KNOWN_DESTINATIONS};
use pesantren_db::{Barang, Database, LedgerConfig, NewPenjualan, NewTransfer};

/// (kode, nama, ownership, harga_jual, harga_beli)
fn catalogue() -> Vec<(&'static str, &'static str, ProductOwnership, i64, i64)> {
    vec![
        ("KB-001", "Sabun Mandi", ProductOwnership::koperasi(), 5_000, 3_500),
        ("KB-002", "Buku Tulis", ProductOwnership::koperasi(), 4_000, 2_800),
        ("KB-003", "Pena", ProductOwnership::koperasi(), 3_000, 1_900),
        ("YY-001", "Kitab Fiqih", ProductOwnership::yayasan(70), 45_000, 30_000),
        ("YY-002", "Sarung", ProductOwnership::yayasan(60), 85_000, 60_000),
        ("YY-003", "Mukena", ProductOwnership::yayasan(50), 120_000, 90_000),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pesantren Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: from config)");
                println!("  -c, --config <PATH>  Config file path (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = LedgerConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = Some(path);
    }

    init_tracing(&config.logging.filter);

    let db = Database::new(config.db_config()?).await?;
    info!(path = %config.database_path()?.display(), "Connected to database");

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
    } else {
        seed(&db).await?;
    }

    report(&db, &config).await?;

    db.close().await;
    Ok(())
}

/// Initializes tracing. `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// First day of the current month and today.
fn current_period() -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let start = today.with_day(1).unwrap_or(today);
    (start, today)
}

async fn seed(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let (start, today) = current_period();
    let span = (today - start).num_days() + 1;
    let day = |n: usize| start + Duration::days(n as i64 % span);

    let mut products = Vec::new();
    for (kode, nama, ownership, harga_jual, harga_beli) in catalogue() {
        let barang = Barang::new(kode, nama, ownership, harga_jual, Some(harga_beli)).with_stok(100);
        products.push(db.products().insert(&barang).await?);
    }
    info!(count = products.len(), "Products seeded");

    let mut transfers = 0;
    for (n, destination) in KNOWN_DESTINATIONS.iter().enumerate() {
        for (m, barang) in products.iter().filter(|b| b.kode_barang.starts_with("YY")).enumerate() {
            let jumlah = ((n * 7 + m * 3) % 12 + 1) as i64;
            let transfer = NewTransfer::new(
                &barang.nama_barang,
                *destination,
                jumlah,
                barang.harga_beli.unwrap_or_default(),
                day(n * 3 + m),
            );
            db.transfers().insert(&transfer).await?;
            transfers += 1;
        }
    }
    info!(count = transfers, "Transfers seeded");

    let mut sales = 0;
    for (n, barang) in products.iter().enumerate() {
        for k in 0..4 {
            let jumlah = (k % 3 + 1) as i64;
            let kondisi = if barang.kode_barang.starts_with("YY") && k == 3 {
                ItemCondition::Damaged
            } else {
                ItemCondition::Good
            };
            let sale = NewPenjualan::new(&barang.id, jumlah, barang.harga_jual * jumlah, day(n + k * 5))
                .kondisi(kondisi);
            db.sales().insert(&sale).await?;
            sales += 1;
        }
    }
    info!(count = sales, "Sales seeded");

    Ok(())
}

async fn report(db: &Database, config: &LedgerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (start, end) = current_period();
    let ledger = db.ledger();

    let summary = ledger.period_summary(start, end).await?;
    println!("Transfer summary:\n{}", serde_json::to_string_pretty(&summary)?);

    let assets = ledger.asset_sales_summary(start, end).await?;
    println!("Asset sales:\n{}", serde_json::to_string_pretty(&assets)?);

    let koperasi = ledger.koperasi_sales_summary(start, end).await?;
    println!("Koperasi sales:\n{}", serde_json::to_string_pretty(&koperasi)?);

    let request = config.bagi_hasil_request(&start.to_string(), &end.to_string(), 50_000.0);
    match ledger.run_bagi_hasil(&request).await {
        Ok(result) => println!("Bagi hasil:\n{}", serde_json::to_string_pretty(&result)?),
        // A month without net profit is a normal outcome, not a seed failure.
        Err(err) if err.as_validation().is_some() => warn!(error = %err, "Bagi hasil not run"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
