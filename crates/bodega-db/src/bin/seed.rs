//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default database
//! cargo run -p bodega-db --bin seed
//!
//! # Specify database path and product count
//! cargo run -p bodega-db --bin seed -- --db ./bodega.db --count 50
//! ```
//!
//! Each product gets a unique in-house barcode, a deterministic
//! pseudo-random price between 1.00 and 60.00, and stock between 0 and 40.

use std::env;

use bodega_core::NewProduct;
use bodega_db::{Database, DbConfig};

/// Corner-store staples for realistic demo data.
const PRODUCTS: &[&str] = &[
    "Milk 1L",
    "Whole Wheat Bread",
    "White Rice 1kg",
    "Black Beans 500g",
    "Sugar 1kg",
    "Salt 500g",
    "Sunflower Oil 900ml",
    "Eggs (dozen)",
    "Butter 200g",
    "Queso Fresco 400g",
    "Cola 600ml",
    "Orange Soda 600ml",
    "Still Water 1L",
    "Sparkling Water 600ml",
    "Ground Coffee 250g",
    "Corn Tortillas 1kg",
    "Flour Tortillas 500g",
    "Tomato Sauce 210g",
    "Pasta Spaghetti 500g",
    "Instant Noodles",
    "Potato Chips 45g",
    "Chocolate Bar",
    "Cookies 100g",
    "Laundry Soap Bar",
    "Dish Soap 500ml",
    "Toilet Paper (4 rolls)",
    "Toothpaste 75ml",
    "Shampoo 400ml",
    "Matches (box)",
    "Candles (pack)",
];

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let db_path = arg_value(&args, "--db").unwrap_or_else(|| "./bodega.db".to_string());
    let count: usize = arg_value(&args, "--count")
        .and_then(|v| v.parse().ok())
        .unwrap_or(PRODUCTS.len());

    println!("Seeding {count} products into {db_path}");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .expect("failed to open database");

    let mut seeded = 0;
    for i in 0..count {
        let name = PRODUCTS[i % PRODUCTS.len()];
        let name = if i < PRODUCTS.len() {
            name.to_string()
        } else {
            format!("{name} #{}", i / PRODUCTS.len() + 1)
        };

        // Deterministic pseudo-random price/stock so reruns are comparable.
        let price = 1.0 + ((i * 37) % 590) as f64 / 10.0;
        let quantity = ((i * 13) % 41) as i64;

        let fields = NewProduct {
            name,
            barcode: format!("BODEGA-{:05}", i + 1),
            price,
            quantity,
        };

        match db.products().create(&fields).await {
            Ok(_) => seeded += 1,
            Err(e) if e.is_duplicate_barcode() => {
                // Already seeded on a previous run; skip quietly.
            }
            Err(e) => {
                eprintln!("failed to seed product {}: {e}", i + 1);
                std::process::exit(1);
            }
        }
    }

    let total = db.products().count().await.expect("count failed");
    println!("Seeded {seeded} new products ({total} total in database)");

    db.close().await;
}

/// Returns the value following `flag` in the argument list, if any.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
