//! # Test Fixtures
//!
//! An in-memory implementation of the storage port so manager tests run
//! without a database, plus catalog fixture builders. The store enforces
//! the same conflict rules the SQLite adapter enforces with its unique
//! indexes and guarded updates; the managers cannot tell them apart.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use parkwash_core::{
    OrderStatus, Service, ServiceOrder, ServiceOrderItem, SessionStatus, VehicleSession,
    VehicleType,
};

use crate::store::{CatalogStore, OrderStore, SessionStore, StoreError, StoreResult};

// =============================================================================
// Fixture Builders
// =============================================================================

pub fn vehicle_type_fixture(
    id: &str,
    hourly_rate_cents: i64,
    fraction_price_cents: i64,
    fraction_minutes: i64,
) -> VehicleType {
    let now = Utc::now();
    VehicleType {
        id: id.to_string(),
        name: "Car".to_string(),
        hourly_rate_cents,
        fraction_price_cents,
        fraction_minutes,
        daily_rate_cents: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn service_fixture(id: &str, name: &str, price_cents: i64, duration_minutes: i64) -> Service {
    let now = Utc::now();
    Service {
        id: id.to_string(),
        name: name.to_string(),
        price_cents,
        duration_minutes,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Memory Store
// =============================================================================

#[derive(Default)]
pub struct MemoryStore {
    vehicle_types: Mutex<Vec<VehicleType>>,
    services: Mutex<Vec<Service>>,
    sessions: Mutex<Vec<VehicleSession>>,
    orders: Mutex<Vec<ServiceOrder>>,
    order_items: Mutex<Vec<ServiceOrderItem>>,
    /// Inserts to fail with DuplicateCode before behaving normally.
    forced_code_collisions: Mutex<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn add_vehicle_type(&self, vt: VehicleType) {
        self.vehicle_types.lock().unwrap().push(vt);
    }

    pub fn add_service(&self, service: Service) {
        self.services.lock().unwrap().push(service);
    }

    /// Mutates catalog rates, standing in for an admin edit after
    /// sessions were opened.
    pub fn set_vehicle_type_rates(&self, id: &str, hourly_rate_cents: i64, fraction_price_cents: i64) {
        let mut types = self.vehicle_types.lock().unwrap();
        if let Some(vt) = types.iter_mut().find(|vt| vt.id == id) {
            vt.hourly_rate_cents = hourly_rate_cents;
            vt.fraction_price_cents = fraction_price_cents;
            vt.updated_at = Utc::now();
        }
    }

    /// Mutates a catalog price, standing in for an admin edit after
    /// orders were created.
    pub fn set_service_price(&self, id: &str, price_cents: i64) {
        let mut services = self.services.lock().unwrap();
        if let Some(svc) = services.iter_mut().find(|s| s.id == id) {
            svc.price_cents = price_cents;
            svc.updated_at = Utc::now();
        }
    }

    /// Makes the next `n` inserts report a code collision.
    pub fn fail_next_inserts_with_code_collision(&self, n: u32) {
        *self.forced_code_collisions.lock().unwrap() = n;
    }

    fn take_forced_collision(&self) -> bool {
        let mut remaining = self.forced_code_collisions.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Port Implementations
// =============================================================================

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn vehicle_type(&self, id: &str) -> StoreResult<Option<VehicleType>> {
        Ok(self
            .vehicle_types
            .lock()
            .unwrap()
            .iter()
            .find(|vt| vt.id == id)
            .cloned())
    }

    async fn service(&self, id: &str) -> StoreResult<Option<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_active_by_plate(&self, plate: &str) -> StoreResult<Option<VehicleSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.plate == plate && s.status == SessionStatus::Active)
            .cloned())
    }

    async fn find_active_by_code_or_plate(
        &self,
        key: &str,
    ) -> StoreResult<Option<VehicleSession>> {
        let sessions = self.sessions.lock().unwrap();
        let by_code = sessions
            .iter()
            .find(|s| s.code == key && s.status == SessionStatus::Active);
        Ok(by_code
            .or_else(|| {
                sessions
                    .iter()
                    .find(|s| s.plate == key && s.status == SessionStatus::Active)
            })
            .cloned())
    }

    async fn insert(&self, session: &VehicleSession) -> StoreResult<()> {
        if self.take_forced_collision() {
            return Err(StoreError::DuplicateCode);
        }

        let mut sessions = self.sessions.lock().unwrap();
        if sessions.iter().any(|s| s.code == session.code) {
            return Err(StoreError::DuplicateCode);
        }
        if sessions
            .iter()
            .any(|s| s.plate == session.plate && s.status == SessionStatus::Active)
        {
            return Err(StoreError::DuplicateActiveSession);
        }
        sessions.push(session.clone());
        Ok(())
    }

    async fn complete_exit(&self, session: &VehicleSession) -> StoreResult<()> {
        self.guarded_session_replace(session)
    }

    async fn cancel(&self, session: &VehicleSession) -> StoreResult<()> {
        self.guarded_session_replace(session)
    }
}

impl MemoryStore {
    /// Replaces a stored session only while it is still Active, the way
    /// the SQL adapter guards with `WHERE status = 'active'`.
    fn guarded_session_replace(&self, session: &VehicleSession) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions
            .iter_mut()
            .find(|s| s.id == session.id && s.status == SessionStatus::Active)
        {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(StoreError::ConcurrentModification),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ServiceOrder>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn insert(&self, order: &ServiceOrder, items: &[ServiceOrderItem]) -> StoreResult<()> {
        if self.take_forced_collision() {
            return Err(StoreError::DuplicateCode);
        }

        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.code == order.code) {
            return Err(StoreError::DuplicateCode);
        }
        orders.push(order.clone());
        self.order_items.lock().unwrap().extend_from_slice(items);
        Ok(())
    }

    async fn items_for(&self, order_id: &str) -> StoreResult<Vec<ServiceOrderItem>> {
        Ok(self
            .order_items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn apply_transition(
        &self,
        order: &ServiceOrder,
        expected: OrderStatus,
    ) -> StoreResult<()> {
        let mut orders = self.orders.lock().unwrap();
        match orders
            .iter_mut()
            .find(|o| o.id == order.id && o.status == expected)
        {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(StoreError::ConcurrentModification),
        }
    }
}
