//! # Seed Data Generator
//!
//! Populates the database with a noodle-shop menu and a few weeks of paid
//! orders, so reports and exports have something to show during development.
//!
//! ## Usage
//! ```bash
//! # Menu plus 14 days of history (default)
//! cargo run -p noodle-db --bin seed
//!
//! # Longer history
//! cargo run -p noodle-db --bin seed -- --days 60
//!
//! # Specify database path
//! cargo run -p noodle-db --bin seed -- --db ./data/noodle.db
//! ```
//!
//! Order contents are derived from the day and order index, so two runs on
//! the same day produce the same history.

use chrono::{Duration, Utc};
use std::env;

use noodle_core::{MenuItem, Money, Order, TaxRate};
use noodle_db::{demo_menu, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 14;
    let mut db_path = String::from("./noodle_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(14);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Noodle Money Buddy Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of order history to generate (default: 14)");
                println!("  -d, --db <PATH>    Database file path (default: ./noodle_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍜 Noodle Money Buddy Seed Data Generator");
    println!("=========================================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.menu().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} menu items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let menu = demo_menu();

    for item in &menu {
        db.menu().upsert(item).await?;
    }
    println!("✓ Inserted {} menu items", menu.len());

    let start = std::time::Instant::now();
    let today = Utc::now();
    let mut generated = 0usize;
    let mut revenue = Money::zero();

    for day in 0..days {
        let orders_today = 4 + (day as usize * 7) % 9;
        for n in 0..orders_today {
            let seed = day as usize * 31 + n;
            let created_at = today - Duration::days(day) - Duration::minutes((n * 37) as i64);
            let order = generate_order(&menu, created_at, seed)?;

            revenue += order.total();
            db.orders().save(&order).await?;
            generated += 1;
        }
    }

    println!();
    println!(
        "✓ Generated {} paid orders ({} total) in {:?}",
        generated,
        revenue,
        start.elapsed()
    );
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one paid order of one to three dishes.
fn generate_order(
    menu: &[MenuItem],
    created_at: chrono::DateTime<Utc>,
    seed: usize,
) -> Result<Order, noodle_core::CoreError> {
    let mut order = Order::new_at(TaxRate::zero(), created_at);

    let lines = 1 + seed % 3;
    for k in 0..lines {
        let item = &menu[(seed * 17 + k * 5) % menu.len()];
        let quantity = 1 + ((seed + k) % 3) as i64;
        order.add_item(item, quantity)?;
    }

    // Round the tender up to the next ₱100 like a customer handing over bills
    let total = order.total().cents();
    let tendered = ((total + 9_999) / 10_000) * 10_000;
    order.process_payment(Money::from_cents(tendered))?;

    Ok(order)
}
