//! # Seed Data Generator
//!
//! Populates the database with a small demo workshop.
//!
//! ## Usage
//! ```bash
//! cargo run -p fabstock-db --bin seed
//!
//! # Specify database path
//! cargo run -p fabstock-db --bin seed -- --db ./data/fabstock.db
//! ```
//!
//! ## Generated Data
//! - Suppliers (market gardener, grocery wholesaler, packaging)
//! - Raw materials with opening stock, some already under their threshold
//! - Finished products with barcodes
//! - Two manufacturing orders for today

use chrono::{Local, NaiveDate, Utc};
use std::env;

use fabstock_core::order::{new_order, start_of_day, OrderDraft};
use fabstock_core::{FinishedProduct, Priority, Quantity, RawMaterial, Supplier, Unit};
use fabstock_db::repository::generate_id;
use fabstock_db::{Database, DbConfig};

const SEED_USER: &str = "seed";

/// (name, contact, email, delivery days)
const SUPPLIERS: &[(&str, &str, &str, i64)] = &[
    ("Maraîcher Dupont", "Jean Dupont", "contact@maraicher-dupont.fr", 1),
    ("Épicerie Centrale Pro", "Service commandes", "commandes@epicerie-centrale.fr", 3),
    ("Emballages du Sud", "Sophie Martin", "s.martin@emballages-sud.fr", 7),
];

/// (name, reference, barcode, category, unit, quantity, minimum, supplier index)
const RAW_MATERIALS: &[(&str, &str, &str, &str, Unit, &str, &str, usize)] = &[
    ("Tomates", "MP-TOM", "3760001000011", "Légumes", Unit::Kilogram, "10", "5", 0),
    ("Oignons", "MP-OIG", "3760001000028", "Légumes", Unit::Kilogram, "4.5", "5", 0),
    ("Basilic", "MP-BAS", "3760001000035", "Herbes", Unit::Kilogram, "0", "0.5", 0),
    ("Huile d'olive", "MP-HUI", "3760001000042", "Épicerie", Unit::Litre, "12", "3", 1),
    ("Sel fin", "MP-SEL", "3760001000059", "Épicerie", Unit::Kilogram, "8.25", "1", 1),
    ("Sucre", "MP-SUC", "3760001000066", "Épicerie", Unit::Kilogram, "20", "5", 1),
    ("Bocaux 500g", "MP-BOC", "3760001000073", "Emballages", Unit::Unite, "240", "100", 2),
    ("Cartons x12", "MP-CAR", "3760001000080", "Emballages", Unit::Carton, "15", "20", 2),
];

/// (name, reference, barcode, production unit, minutes, target, price cents)
const FINISHED_PRODUCTS: &[(&str, &str, &str, &str, i64, i64, i64)] = &[
    ("Sauce tomate basilic", "PF-SAUCE", "3760002000010", "bocal 500g", 120, 200, 450),
    ("Confit d'oignons", "PF-CONFIT", "3760002000027", "bocal 250g", 180, 100, 520),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fabstock_dev.db");

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
                println!("fabstock seed data generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fabstock_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 fabstock seed data generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.raw_materials().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} raw materials", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    let mut suppliers = Vec::new();
    for (name, contact, email, days) in SUPPLIERS {
        let supplier = Supplier {
            id: generate_id(),
            name: name.to_string(),
            contact: Some(contact.to_string()),
            email: Some(email.to_string()),
            phone: None,
            address: None,
            average_delivery_days: *days,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: SEED_USER.to_string(),
        };
        suppliers.push(db.suppliers().insert(&supplier).await?);
    }
    println!("✓ {} suppliers", suppliers.len());

    for (name, reference, barcode, category, unit, quantity, minimum, supplier_idx) in RAW_MATERIALS {
        let supplier = &suppliers[*supplier_idx];
        let material = RawMaterial {
            id: generate_id(),
            name: name.to_string(),
            reference: Some(reference.to_string()),
            barcode: Some(barcode.to_string()),
            category: Some(category.to_string()),
            unit: *unit,
            quantity_milli: quantity.parse::<Quantity>()?.milli(),
            min_stock_milli: minimum.parse::<Quantity>()?.milli(),
            supplier_id: Some(supplier.id.clone()),
            supplier_name: Some(supplier.name.clone()),
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: SEED_USER.to_string(),
        };
        db.raw_materials().insert(&material).await?;
    }
    println!("✓ {} raw materials", RAW_MATERIALS.len());

    let mut products = Vec::new();
    for (name, reference, barcode, unit, minutes, target, price) in FINISHED_PRODUCTS {
        let product = FinishedProduct {
            id: generate_id(),
            name: name.to_string(),
            reference: reference.to_string(),
            barcode: Some(barcode.to_string()),
            category: Some("Conserves".to_string()),
            production_unit: Some(unit.to_string()),
            production_time_minutes: Some(*minutes),
            target_stock: *target,
            current_stock: 0,
            sale_price_cents: Some(*price),
            production_instructions: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: SEED_USER.to_string(),
        };
        products.push(db.finished_products().insert(&product).await?);
    }
    println!("✓ {} finished products", products.len());

    let local_now = Local::now();
    for (product, quantity, priority) in [(&products[0], 50, Priority::High), (&products[1], 24, Priority::Normal)] {
        let draft = OrderDraft {
            quantity,
            expected_completion_date: Some(local_now.date_naive()),
            priority,
            instructions: None,
        };
        let order = new_order(generate_id(), String::new(), product, draft, SEED_USER, Utc::now())?;
        let stored = db
            .orders()
            .insert_numbered(order, local_now.date_naive(), start_of_day(&local_now))
            .await?;
        println!("✓ Order {}", stored.order_number);
    }

    println!();
    println!("🎉 Seed complete!");

    Ok(())
}
