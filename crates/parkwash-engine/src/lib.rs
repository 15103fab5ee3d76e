//! # parkwash-engine: Tariff & Lifecycle Engine
//!
//! The state machines of ParkWash POS: parking sessions from entry to
//! close-out, wash orders from creation to delivery.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     ParkWash POS Data Flow                          │
//! │                                                                     │
//! │  Request layer (out of scope)                                       │
//! │       │  "register entry", "process exit",                          │
//! │       │  "create order", "advance status"                           │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 parkwash-engine (THIS CRATE)                  │  │
//! │  │                                                               │  │
//! │  │  ┌──────────────────────┐   ┌──────────────────────┐          │  │
//! │  │  │ VehicleSessionManager│   │ ServiceOrderManager  │          │  │
//! │  │  │ Active→Paid/Cancelled│   │ Pending→…→Delivered  │          │  │
//! │  │  └──────────┬───────────┘   └──────────┬───────────┘          │  │
//! │  │             │        port traits       │                      │  │
//! │  │  ┌──────────▼─────────────────────────▼───────────┐           │  │
//! │  │  │  SessionStore / OrderStore / CatalogStore      │           │  │
//! │  │  └──────────────────────┬─────────────────────────┘           │  │
//! │  └─────────────────────────┼─────────────────────────────────────┘  │
//! │                            │ implemented by                         │
//! │                            ▼                                        │
//! │                     parkwash-db (SQLite adapter)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sessions`] - VehicleSessionManager (entry, exit, cancellation)
//! - [`orders`] - ServiceOrderManager (creation, status advancement)
//! - [`store`] - Persistence port traits and their error type
//! - [`config`] - Engine configuration (tariff policy selection)
//! - [`error`] - Engine error types
//!
//! ## Concurrency Model
//!
//! The engine has no internal threads and takes no locks. Every command
//! runs synchronously per request; the check-then-act invariants (one
//! Active session per plate, one billing mutation per session) are
//! enforced by the storage adapter through unique indexes and guarded
//! updates, surfaced here as typed conflict errors.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod orders;
pub mod sessions;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use orders::{AdvanceStatus, CreateOrder, OrderLineInput, PlacedOrder, ServiceOrderManager};
pub use sessions::{CancelSession, ProcessExit, RegisterEntry, VehicleSessionManager};
pub use store::{CatalogStore, OrderStore, SessionStore, StoreError, StoreResult};
