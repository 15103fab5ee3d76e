//! # parkwash-db: Database Layer for ParkWash POS
//!
//! SQLite persistence for ParkWash, and the adapter that plugs it into
//! the parkwash-engine storage port.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     ParkWash POS Data Flow                          │
//! │                                                                     │
//! │  parkwash-engine (lifecycle managers)                               │
//! │       │ storage port traits                                         │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                   parkwash-db (THIS CRATE)                    │  │
//! │  │                                                               │  │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌──────────────┐        │  │
//! │  │   │  Database  │   │ Repositories │   │  Migrations  │        │  │
//! │  │   │ (pool.rs)  │◄──│ catalog.rs   │   │  (embedded)  │        │  │
//! │  │   │ SqlitePool │   │ session.rs   │   │ 001_init.sql │        │  │
//! │  │   │ WAL mode   │   │ order.rs     │   │              │        │  │
//! │  │   └────────────┘   └──────▲───────┘   └──────────────┘        │  │
//! │  │                          │                                    │  │
//! │  │              ┌───────────┴───────────┐                        │  │
//! │  │              │ SqliteStore (store.rs)│  port adapter          │  │
//! │  │              └───────────────────────┘                        │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, session, order)
//! - [`store`] - Engine storage-port adapter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use parkwash_db::{Database, DbConfig};
//! use parkwash_engine::{EngineConfig, VehicleSessionManager};
//!
//! let db = Database::new(DbConfig::new("./parkwash.db")).await?;
//! let store = Arc::new(db.store());
//! let sessions = VehicleSessionManager::new(
//!     store.clone(),
//!     store.clone(),
//!     EngineConfig::default(),
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use store::SqliteStore;

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;
pub use repository::session::SessionRepository;
