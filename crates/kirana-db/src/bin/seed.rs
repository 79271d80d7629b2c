//! # Store Initializer
//!
//! Creates (or opens) a store database, applies migrations and installs
//! the default catalog if the products table is empty, then prints a
//! summary of what is on the shelves.
//!
//! ## Usage
//! ```bash
//! # Default path (./kirana.db)
//! cargo run -p kirana-db --bin seed
//!
//! # Custom path
//! cargo run -p kirana-db --bin seed -- --db ./data/shop.db
//! ```
//!
//! Running it twice is safe: a non-empty catalog is left alone.

use std::env;

use kirana_db::migrations::migration_status;
use kirana_db::{Store, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kirana.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kirana POS Store Initializer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kirana.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Kirana POS Store Initializer");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    // Store::open runs migrations and the idempotent seed itself.
    let store = Store::open(StoreConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    let (total, applied) = migration_status(store.pool()).await?;
    println!("✓ Migrations applied ({}/{})", applied, total);
    println!();

    let products = store.catalog().count().await?;
    let history = store.history().count().await?;
    let sales = store.sales().count().await?;

    println!("Catalog:       {} products", products);
    println!("Stock history: {} entries", history);
    println!("Sales ledger:  {} records", sales);
    println!();

    for product in store.catalog().list_all().await? {
        println!(
            "  {:<10} {:<24} {:>10}  stock {:>4}",
            product.scan_code,
            product.name,
            product.price().to_string(),
            product.quantity
        );
    }

    println!();
    println!("✓ Store ready");

    store.close().await;
    Ok(())
}
