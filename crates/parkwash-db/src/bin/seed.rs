//! # Seed Data Generator
//!
//! Populates the database with a demo catalog and walks one parking
//! session and one wash order through their lifecycles.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p parkwash-db --bin seed
//!
//! # Specify database path
//! cargo run -p parkwash-db --bin seed -- --db ./data/parkwash.db
//!
//! # Skip the lifecycle demo, seed the catalog only
//! cargo run -p parkwash-db --bin seed -- --catalog-only
//! ```

use std::env;
use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use parkwash_core::{PaymentMethod, Service, VehicleType};
use parkwash_db::{Database, DbConfig, SqliteStore};
use parkwash_engine::{
    AdvanceStatus, CreateOrder, EngineConfig, OrderLineInput, ProcessExit, RegisterEntry,
    ServiceOrderManager, VehicleSessionManager,
};

/// Demo vehicle types: (name, hourly, fraction price, fraction minutes, daily)
const VEHICLE_TYPES: &[(&str, i64, i64, i64, Option<i64>)] = &[
    ("Car", 3000, 1000, 15, Some(15000)),
    ("Motorcycle", 1500, 500, 15, Some(8000)),
    ("Truck", 5000, 2000, 20, Some(28000)),
];

/// Demo wash services: (name, price cents, duration minutes)
const SERVICES: &[(&str, i64, i64)] = &[
    ("Exterior wash", 8000, 20),
    ("Interior vacuum", 5000, 25),
    ("Wax coat", 5000, 30),
    ("Engine bay wash", 12000, 40),
    ("Full detail", 35000, 120),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./parkwash_dev.db");
    let mut catalog_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--catalog-only" => {
                catalog_only = true;
            }
            "--help" | "-h" => {
                println!("ParkWash POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./parkwash_dev.db)");
                println!("      --catalog-only Seed the catalog without the lifecycle demo");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("ParkWash POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let catalog = db.catalog();

    let existing = catalog.count_vehicle_types().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {} vehicle types, skipping seed", existing);
    } else {
        let now = Utc::now();
        for (name, hourly, fraction_price, fraction_minutes, daily) in VEHICLE_TYPES {
            catalog
                .insert_vehicle_type(&VehicleType {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    hourly_rate_cents: *hourly,
                    fraction_price_cents: *fraction_price,
                    fraction_minutes: *fraction_minutes,
                    daily_rate_cents: *daily,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        for (name, price, duration) in SERVICES {
            catalog
                .insert_service(&Service {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    price_cents: *price,
                    duration_minutes: *duration,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        println!(
            "✓ Seeded {} vehicle types, {} services",
            VEHICLE_TYPES.len(),
            SERVICES.len()
        );
    }

    if catalog_only {
        println!();
        println!("✓ Seed complete (catalog only)");
        return Ok(());
    }

    // Walk one session and one order through their lifecycles so a fresh
    // checkout has something to look at.
    let store = Arc::new(SqliteStore::new(db.clone()));
    let config = EngineConfig::default();
    let sessions = VehicleSessionManager::new(store.clone(), store.clone(), config);
    let orders = ServiceOrderManager::new(store.clone(), store.clone(), config);

    let car = catalog
        .list_active_vehicle_types()
        .await?
        .into_iter()
        .find(|vt| vt.name == "Car")
        .ok_or("seed catalog is missing the Car vehicle type")?;
    let wash_services = catalog.list_active_services().await?;

    println!();
    println!("Running lifecycle demo...");

    // Parking: a car enters and immediately pays its way out.
    let plate = format!("DEMO-{}", Utc::now().format("%H%M%S"));
    let session = sessions
        .register_entry(RegisterEntry {
            plate: plate.clone(),
            vehicle_type_id: car.id.clone(),
            owner_name: Some("Walk-in customer".to_string()),
            owner_phone: None,
            notes: None,
            user_id: "seed".to_string(),
        })
        .await?;
    println!("  entry registered: {} ({})", session.code, session.plate);

    let paid = sessions
        .process_exit(ProcessExit {
            key: session.code.clone(),
            payment_method: PaymentMethod::Cash,
            user_id: "seed".to_string(),
        })
        .await?;
    println!(
        "  exit processed: {} minutes, {} cents",
        paid.total_minutes.unwrap_or(0),
        paid.total_cents.unwrap_or(0)
    );

    // Wash: an order with two services, advanced all the way through.
    let placed = orders
        .create_order(CreateOrder {
            plate,
            vehicle_type_id: car.id.clone(),
            lines: wash_services
                .iter()
                .take(2)
                .map(|s| OrderLineInput {
                    service_id: s.id.clone(),
                    quantity: Some(1),
                })
                .collect(),
            notes: Some("seed demo order".to_string()),
            user_id: "seed".to_string(),
        })
        .await?;
    println!(
        "  order created: {} total {} cents",
        placed.order.code, placed.order.total_cents
    );

    let mut order = placed.order;
    for target in [
        parkwash_core::OrderStatus::InProgress,
        parkwash_core::OrderStatus::Done,
        parkwash_core::OrderStatus::Delivered,
    ] {
        order = orders
            .advance_status(AdvanceStatus {
                order_id: order.id.clone(),
                target,
                payment_method: (target == parkwash_core::OrderStatus::Done)
                    .then_some(PaymentMethod::Card),
                user_id: "seed".to_string(),
            })
            .await?;
    }
    println!("  order delivered: {}", serde_json::to_string_pretty(&order)?);

    println!();
    println!("✓ Seed complete");

    Ok(())
}
