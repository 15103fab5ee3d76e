//! # Storage Port Adapter
//!
//! Implements the parkwash-engine storage port over the SQLite
//! repositories. This is the single place where database conflicts turn
//! into the engine's typed conflicts:
//!
//! ```text
//! UniqueViolation on …sessions.plate  → StoreError::DuplicateActiveSession
//! UniqueViolation on ….code           → StoreError::DuplicateCode
//! NotFound from a guarded update      → StoreError::ConcurrentModification
//! anything else                       → StoreError::Backend
//! ```
//!
//! Swapping the storage technology means writing another adapter behind
//! the same port; the engine logic is untouched.

use async_trait::async_trait;

use parkwash_core::{
    OrderStatus, Service, ServiceOrder, ServiceOrderItem, VehicleSession, VehicleType,
};
use parkwash_engine::{CatalogStore, OrderStore, SessionStore, StoreError, StoreResult};

use crate::error::DbError;
use crate::pool::Database;

/// The SQLite implementation of the engine storage port.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Creates an adapter over the given database handle.
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }
}

/// Maps a database error to the port error the engine understands.
///
/// `NotFound` only reaches here from guarded updates (the find methods
/// return `Ok(None)`), so it always means a lost read-then-write race.
fn to_store_error(err: DbError) -> StoreError {
    if err.is_unique_violation_on("plate") {
        return StoreError::DuplicateActiveSession;
    }
    if err.is_unique_violation_on("code") {
        return StoreError::DuplicateCode;
    }
    match err {
        DbError::NotFound { .. } => StoreError::ConcurrentModification,
        other => StoreError::Backend(other.to_string()),
    }
}

// =============================================================================
// Port Implementations
// =============================================================================

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn vehicle_type(&self, id: &str) -> StoreResult<Option<VehicleType>> {
        self.db
            .catalog()
            .get_vehicle_type(id)
            .await
            .map_err(to_store_error)
    }

    async fn service(&self, id: &str) -> StoreResult<Option<Service>> {
        self.db
            .catalog()
            .get_service(id)
            .await
            .map_err(to_store_error)
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn find_active_by_plate(&self, plate: &str) -> StoreResult<Option<VehicleSession>> {
        self.db
            .sessions()
            .find_active_by_plate(plate)
            .await
            .map_err(to_store_error)
    }

    async fn find_active_by_code_or_plate(
        &self,
        key: &str,
    ) -> StoreResult<Option<VehicleSession>> {
        let sessions = self.db.sessions();
        if let Some(session) = sessions
            .find_active_by_code(key)
            .await
            .map_err(to_store_error)?
        {
            return Ok(Some(session));
        }
        sessions
            .find_active_by_plate(key)
            .await
            .map_err(to_store_error)
    }

    async fn insert(&self, session: &VehicleSession) -> StoreResult<()> {
        self.db
            .sessions()
            .insert(session)
            .await
            .map_err(to_store_error)
    }

    async fn complete_exit(&self, session: &VehicleSession) -> StoreResult<()> {
        self.db
            .sessions()
            .close_out(session)
            .await
            .map_err(to_store_error)
    }

    async fn cancel(&self, session: &VehicleSession) -> StoreResult<()> {
        self.db
            .sessions()
            .close_out(session)
            .await
            .map_err(to_store_error)
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceOrder>> {
        self.db.orders().get_by_id(id).await.map_err(to_store_error)
    }

    async fn insert(&self, order: &ServiceOrder, items: &[ServiceOrderItem]) -> StoreResult<()> {
        self.db
            .orders()
            .insert(order, items)
            .await
            .map_err(to_store_error)
    }

    async fn items_for(&self, order_id: &str) -> StoreResult<Vec<ServiceOrderItem>> {
        self.db
            .orders()
            .get_items(order_id)
            .await
            .map_err(to_store_error)
    }

    async fn apply_transition(
        &self,
        order: &ServiceOrder,
        expected: OrderStatus,
    ) -> StoreResult<()> {
        self.db
            .orders()
            .apply_transition(order, expected)
            .await
            .map_err(to_store_error)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
// Full engine flows against a real (in-memory) SQLite database: the same
// invariants the engine tests check against the memory fixtures must hold
// with the unique indexes and guarded updates doing the enforcement.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use chrono::Utc;
    use std::sync::Arc;

    use parkwash_core::{PaymentMethod, SessionStatus};
    use parkwash_engine::{
        AdvanceStatus, CreateOrder, EngineConfig, EngineError, OrderLineInput, ProcessExit,
        RegisterEntry, ServiceOrderManager, VehicleSessionManager,
    };

    async fn seeded_store() -> Arc<SqliteStore> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        db.catalog()
            .insert_vehicle_type(&VehicleType {
                id: "vt-car".to_string(),
                name: "Car".to_string(),
                hourly_rate_cents: 3000,
                fraction_price_cents: 1000,
                fraction_minutes: 15,
                daily_rate_cents: Some(15000),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        db.catalog()
            .insert_service(&Service {
                id: "svc-exterior".to_string(),
                name: "Exterior wash".to_string(),
                price_cents: 8000,
                duration_minutes: 20,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db.catalog()
            .insert_service(&Service {
                id: "svc-wax".to_string(),
                name: "Wax coat".to_string(),
                price_cents: 5000,
                duration_minutes: 30,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        Arc::new(db.store())
    }

    fn session_manager(store: &Arc<SqliteStore>) -> VehicleSessionManager {
        VehicleSessionManager::new(store.clone(), store.clone(), EngineConfig::default())
    }

    fn order_manager(store: &Arc<SqliteStore>) -> ServiceOrderManager {
        ServiceOrderManager::new(store.clone(), store.clone(), EngineConfig::default())
    }

    #[tokio::test]
    async fn test_session_flow_over_sqlite() {
        let store = seeded_store().await;
        let mgr = session_manager(&store);

        let session = mgr
            .register_entry(RegisterEntry {
                plate: "abc-123".to_string(),
                vehicle_type_id: "vt-car".to_string(),
                owner_name: None,
                owner_phone: None,
                notes: None,
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Active);

        // The partial unique index is the backstop for a duplicate entry.
        let err = mgr
            .register_entry(RegisterEntry {
                plate: "ABC-123".to_string(),
                vehicle_type_id: "vt-car".to_string(),
                owner_name: None,
                owner_phone: None,
                notes: None,
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateActiveSession { .. }));

        let paid = mgr
            .process_exit(ProcessExit {
                key: session.code.clone(),
                payment_method: PaymentMethod::Cash,
                user_id: "user-2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(paid.status, SessionStatus::Paid);
        assert_eq!(paid.total_cents, Some(1000));

        // Second exit: the Active lookup finds nothing.
        let err = mgr
            .process_exit(ProcessExit {
                key: session.code.clone(),
                payment_method: PaymentMethod::Cash,
                user_id: "user-2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_order_flow_over_sqlite() {
        let store = seeded_store().await;
        let mgr = order_manager(&store);

        let placed = mgr
            .create_order(CreateOrder {
                plate: "abc-123".to_string(),
                vehicle_type_id: "vt-car".to_string(),
                lines: vec![
                    OrderLineInput {
                        service_id: "svc-exterior".to_string(),
                        quantity: Some(1),
                    },
                    OrderLineInput {
                        service_id: "svc-wax".to_string(),
                        quantity: Some(2),
                    },
                ],
                notes: None,
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(placed.order.total_cents, 18000);

        let advance = |target| AdvanceStatus {
            order_id: placed.order.id.clone(),
            target,
            payment_method: None,
            user_id: "user-1".to_string(),
        };

        let in_progress = mgr
            .advance_status(advance(parkwash_core::OrderStatus::InProgress))
            .await
            .unwrap();
        let started_at = in_progress.started_at.unwrap();

        // Idempotent re-entry leaves the stored timestamp untouched.
        let again = mgr
            .advance_status(advance(parkwash_core::OrderStatus::InProgress))
            .await
            .unwrap();
        assert_eq!(again.started_at.unwrap(), started_at);

        mgr.advance_status(AdvanceStatus {
            order_id: placed.order.id.clone(),
            target: parkwash_core::OrderStatus::Done,
            payment_method: Some(PaymentMethod::Card),
            user_id: "user-1".to_string(),
        })
        .await
        .unwrap();

        let delivered = mgr
            .advance_status(advance(parkwash_core::OrderStatus::Delivered))
            .await
            .unwrap();
        assert_eq!(delivered.status, parkwash_core::OrderStatus::Delivered);
        assert_eq!(delivered.payment_method, Some(PaymentMethod::Card));

        let items = mgr.order_items(&placed.order.id).await.unwrap();
        assert_eq!(items.len(), 2);
    }
}
