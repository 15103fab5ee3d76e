//! # Repository Module
//!
//! Database repository implementations for ParkWash POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Engine port call                                                   │
//! │       │                                                             │
//! │       │  store.find_active_by_plate("ABC-123")                      │
//! │       ▼                                                             │
//! │  SessionRepository                                                  │
//! │  ├── find_active_by_plate(&self, plate)                             │
//! │  ├── insert(&self, session)                                         │
//! │  └── complete_exit(&self, session)   ← guarded UPDATE               │
//! │       │                                                             │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  All SQL lives here; the engine never sees a query string.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - VehicleType and Service reference data
//! - [`session::SessionRepository`] - Parking session operations
//! - [`order::OrderRepository`] - Wash order and line item operations

pub mod catalog;
pub mod order;
pub mod session;
