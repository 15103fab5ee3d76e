//! # Persistence Port
//!
//! The storage interface the lifecycle managers run against. One port,
//! swappable adapters: parkwash-db implements it over SQLite, the test
//! fixtures implement it in memory. The engine logic is never duplicated
//! per backend.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Storage Port Contract                           │
//! │                                                                     │
//! │  SessionStore::insert                                               │
//! │    must reject a second Active session for the same plate           │
//! │    (unique index / conflict-detecting write)                        │
//! │       → StoreError::DuplicateActiveSession                          │
//! │    must reject a duplicate code                                     │
//! │       → StoreError::DuplicateCode                                   │
//! │                                                                     │
//! │  SessionStore::complete_exit / cancel                               │
//! │  OrderStore::apply_transition                                       │
//! │    guarded updates: match the expected current status in the        │
//! │    WHERE clause; zero rows affected means another request won       │
//! │       → StoreError::ConcurrentModification                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The managers read an entity, decide, and write it back; the adapter's
//! job is to make that read-then-write sequence safe without the engine
//! holding any lock.

use async_trait::async_trait;
use thiserror::Error;

use parkwash_core::{Service, ServiceOrder, ServiceOrderItem, VehicleSession, VehicleType};

// =============================================================================
// Store Error
// =============================================================================

/// Conflicts and failures a storage adapter can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The generated code is already taken.
    #[error("generated code already exists")]
    DuplicateCode,

    /// An Active session already exists for the plate being inserted.
    #[error("an active session already exists for this plate")]
    DuplicateActiveSession,

    /// A guarded update matched no row: the record changed status (or
    /// vanished) between the manager's read and its write.
    #[error("record was modified concurrently")]
    ConcurrentModification,

    /// Any other backend failure (connection, SQL, serialization).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Catalog Store
// =============================================================================

/// Read-only access to the VehicleType/Service reference tables.
///
/// Injected into the managers so tests can substitute fixtures; the
/// engine never mutates the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Looks up a vehicle type by id. Inactive types are returned as-is;
    /// the managers decide whether inactive is acceptable.
    async fn vehicle_type(&self, id: &str) -> StoreResult<Option<VehicleType>>;

    /// Looks up a service by id.
    async fn service(&self, id: &str) -> StoreResult<Option<Service>>;
}

// =============================================================================
// Session Store
// =============================================================================

/// Storage for parking sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Finds the Active session for a plate, if any.
    async fn find_active_by_plate(&self, plate: &str) -> StoreResult<Option<VehicleSession>>;

    /// Finds an Active session by code (preferred) or plate.
    ///
    /// The key is matched against the code first; only when no Active
    /// session carries that code is it retried as a plate.
    async fn find_active_by_code_or_plate(&self, key: &str)
        -> StoreResult<Option<VehicleSession>>;

    /// Inserts a new session. Must enforce code uniqueness and the
    /// one-Active-session-per-plate invariant at write time.
    async fn insert(&self, session: &VehicleSession) -> StoreResult<()>;

    /// Writes the exit mutation (timestamps, totals, Paid status),
    /// guarded on the session still being Active.
    async fn complete_exit(&self, session: &VehicleSession) -> StoreResult<()>;

    /// Writes an administrative cancellation, guarded on the session
    /// still being Active.
    async fn cancel(&self, session: &VehicleSession) -> StoreResult<()>;
}

// =============================================================================
// Order Store
// =============================================================================

/// Storage for wash orders and their line items.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Looks up an order by id.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceOrder>>;

    /// Inserts an order with its line items atomically. Must enforce
    /// code uniqueness at write time.
    async fn insert(&self, order: &ServiceOrder, items: &[ServiceOrderItem]) -> StoreResult<()>;

    /// Returns the line items of an order.
    async fn items_for(&self, order_id: &str) -> StoreResult<Vec<ServiceOrderItem>>;

    /// Writes a status transition (status, timestamps, payment method),
    /// guarded on the order still being in `expected` status.
    async fn apply_transition(
        &self,
        order: &ServiceOrder,
        expected: parkwash_core::OrderStatus,
    ) -> StoreResult<()>;
}
