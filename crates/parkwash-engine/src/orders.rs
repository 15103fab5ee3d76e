//! # Service Order Manager
//!
//! Owns the car-wash order state machine.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Order Lifecycle                                │
//! │                                                                     │
//! │   Pending ──► InProgress ──► Done ──► Delivered                     │
//! │      │             │         sets      sets finished_at             │
//! │      │             │      finished_at  (if not already set)         │
//! │      │          sets                                                │
//! │      │        started_at                                            │
//! │      │             │                                                │
//! │      └──────┬──────┘                                                │
//! │             ▼                                                       │
//! │         Cancelled                                                   │
//! │                                                                     │
//! │  • transitions advance one step at a time                           │
//! │  • re-invoking a transition is accepted and leaves the already-set  │
//! │    timestamp untouched (first-occurrence semantics)                 │
//! │  • Delivered and Cancelled accept nothing further                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use parkwash_core::codegen;
use parkwash_core::validation::{normalize_plate, validate_quantity};
use parkwash_core::{
    Money, OrderStatus, PaymentMethod, ServiceOrder, ServiceOrderItem, ORDER_CODE_PREFIX,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::store::{CatalogStore, OrderStore, StoreError};

// =============================================================================
// Commands
// =============================================================================

/// One requested service line in a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub service_id: String,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i64>,
}

/// Command: open a wash order for a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub plate: String,
    pub vehicle_type_id: String,
    pub lines: Vec<OrderLineInput>,
    pub notes: Option<String>,
    /// User creating the order.
    pub user_id: String,
}

/// Command: move an order to its next lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceStatus {
    pub order_id: String,
    pub target: OrderStatus,
    /// Recorded when the order enters Done.
    pub payment_method: Option<PaymentMethod>,
    /// User performing the transition.
    pub user_id: String,
}

/// A freshly created order with its snapshotted line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: ServiceOrder,
    pub items: Vec<ServiceOrderItem>,
}

// =============================================================================
// Manager
// =============================================================================

/// Drives wash orders from creation to delivery or cancellation.
#[derive(Clone)]
pub struct ServiceOrderManager {
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn CatalogStore>,
    config: EngineConfig,
}

impl ServiceOrderManager {
    /// Creates a manager over the given stores.
    pub fn new(
        orders: Arc<dyn OrderStore>,
        catalog: Arc<dyn CatalogStore>,
        config: EngineConfig,
    ) -> Self {
        ServiceOrderManager {
            orders,
            catalog,
            config,
        }
    }

    /// Creates a wash order, snapshotting every referenced service.
    ///
    /// The total equals the sum of line subtotals at this moment and is
    /// never recomputed; later catalog price changes do not reach the
    /// order.
    pub async fn create_order(&self, cmd: CreateOrder) -> EngineResult<PlacedOrder> {
        let plate = normalize_plate(&cmd.plate)?;
        debug!(plate = %plate, lines = cmd.lines.len(), "create_order");

        self.catalog
            .vehicle_type(&cmd.vehicle_type_id)
            .await?
            .filter(|vt| vt.is_active)
            .ok_or_else(|| EngineError::InvalidVehicleType(cmd.vehicle_type_id.clone()))?;

        if cmd.lines.is_empty() {
            return Err(EngineError::EmptyOrder);
        }

        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();

        let mut items = Vec::with_capacity(cmd.lines.len());
        let mut total = Money::zero();
        let mut estimated_minutes = 0i64;

        for line in &cmd.lines {
            let quantity = line.quantity.unwrap_or(1);
            validate_quantity(quantity)?;

            let service = self
                .catalog
                .service(&line.service_id)
                .await?
                .filter(|s| s.is_active)
                .ok_or_else(|| EngineError::InvalidService(line.service_id.clone()))?;

            // Price and duration snapshot, frozen at order time.
            let subtotal = service.price().multiply_quantity(quantity);
            total += subtotal;
            estimated_minutes += service.duration_minutes * quantity;

            items.push(ServiceOrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                service_id: service.id.clone(),
                name_snapshot: service.name.clone(),
                unit_price_cents: service.price_cents,
                duration_minutes: service.duration_minutes,
                quantity,
                subtotal_cents: subtotal.cents(),
                created_at: now,
            });
        }

        let mut order = ServiceOrder {
            id: order_id,
            code: codegen::generate(ORDER_CODE_PREFIX),
            plate,
            vehicle_type_id: cmd.vehicle_type_id,
            status: OrderStatus::Pending,
            total_cents: total.cents(),
            estimated_minutes,
            created_at: now,
            started_at: None,
            finished_at: None,
            payment_method: None,
            notes: cmd.notes,
            created_by_user_id: cmd.user_id,
            updated_at: now,
        };

        let attempts = self.config.max_code_retries.max(1);
        for attempt in 1..=attempts {
            match self.orders.insert(&order, &items).await {
                Ok(()) => {
                    info!(
                        order_id = %order.id,
                        code = %order.code,
                        plate = %order.plate,
                        total_cents = order.total_cents,
                        "order created"
                    );
                    return Ok(PlacedOrder { order, items });
                }
                Err(StoreError::DuplicateCode) if attempt < attempts => {
                    warn!(code = %order.code, attempt, "code collision, regenerating");
                    order.code = codegen::generate(ORDER_CODE_PREFIX);
                }
                Err(StoreError::DuplicateCode) => {
                    return Err(EngineError::CodeExhausted { attempts });
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(EngineError::CodeExhausted { attempts })
    }

    /// Moves an order to `target`, applying state-dependent side effects.
    ///
    /// Timestamps follow first-occurrence semantics: a transition whose
    /// timestamp is already set succeeds without overwriting it. The
    /// write is guarded on the status read here; a lost race surfaces
    /// `ConcurrentModification`.
    pub async fn advance_status(&self, cmd: AdvanceStatus) -> EngineResult<ServiceOrder> {
        debug!(order_id = %cmd.order_id, target = ?cmd.target, "advance_status");

        let mut order = self
            .orders
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or_else(|| EngineError::OrderNotFound(cmd.order_id.clone()))?;

        let from = order.status;
        if !transition_allowed(from, cmd.target) {
            return Err(EngineError::InvalidTransition {
                from,
                to: cmd.target,
            });
        }

        let now = Utc::now();
        match cmd.target {
            OrderStatus::InProgress => {
                if order.started_at.is_none() {
                    order.started_at = Some(now);
                }
            }
            OrderStatus::Done => {
                if order.finished_at.is_none() {
                    order.finished_at = Some(now);
                }
                if let Some(method) = cmd.payment_method {
                    order.payment_method = Some(method);
                }
            }
            OrderStatus::Delivered => {
                if order.finished_at.is_none() {
                    order.finished_at = Some(now);
                }
            }
            OrderStatus::Pending | OrderStatus::Cancelled => {}
        }

        order.status = cmd.target;
        order.updated_at = now;

        self.orders.apply_transition(&order, from).await?;

        info!(
            order_id = %order.id,
            from = ?from,
            to = ?order.status,
            "order status advanced"
        );
        Ok(order)
    }

    /// Returns an order's snapshotted line items.
    pub async fn order_items(&self, order_id: &str) -> EngineResult<Vec<ServiceOrderItem>> {
        Ok(self.orders.items_for(order_id).await?)
    }
}

/// The transition table.
///
/// Forward one step at a time; Cancelled escapes from Pending or
/// InProgress; re-entering the current state is accepted so a repeated
/// command stays idempotent. Terminal states accept nothing new.
fn transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match (from, to) {
        (Pending, InProgress) | (InProgress, Done) | (Done, Delivered) => true,
        (Pending, Cancelled) | (InProgress, Cancelled) => true,
        (InProgress, InProgress) | (Done, Done) | (Delivered, Delivered) => true,
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{service_fixture, vehicle_type_fixture, MemoryStore};

    fn manager(store: &Arc<MemoryStore>) -> ServiceOrderManager {
        ServiceOrderManager::new(store.clone(), store.clone(), EngineConfig::default())
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.add_vehicle_type(vehicle_type_fixture("vt-car", 3000, 1000, 15));
        store.add_service(service_fixture("svc-exterior", "Exterior wash", 8000, 20));
        store.add_service(service_fixture("svc-wax", "Wax coat", 5000, 30));
        store
    }

    fn order_cmd(lines: Vec<OrderLineInput>) -> CreateOrder {
        CreateOrder {
            plate: "abc-123".to_string(),
            vehicle_type_id: "vt-car".to_string(),
            lines,
            notes: None,
            user_id: "user-1".to_string(),
        }
    }

    fn line(service_id: &str, quantity: Option<i64>) -> OrderLineInput {
        OrderLineInput {
            service_id: service_id.to_string(),
            quantity,
        }
    }

    async fn advance(
        mgr: &ServiceOrderManager,
        order_id: &str,
        target: OrderStatus,
    ) -> EngineResult<ServiceOrder> {
        mgr.advance_status(AdvanceStatus {
            order_id: order_id.to_string(),
            target,
            payment_method: None,
            user_id: "user-1".to_string(),
        })
        .await
    }

    #[tokio::test]
    async fn test_create_order_totals() {
        let store = seeded_store();
        let placed = manager(&store)
            .create_order(order_cmd(vec![
                line("svc-exterior", Some(1)),
                line("svc-wax", Some(2)),
            ]))
            .await
            .unwrap();

        // 8000 × 1 + 5000 × 2
        assert_eq!(placed.order.total_cents, 18000);
        assert_eq!(placed.order.estimated_minutes, 20 + 2 * 30);
        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.order.plate, "ABC-123");
        assert!(placed.order.code.starts_with("WS"));

        assert_eq!(placed.items.len(), 2);
        assert_eq!(placed.items[0].subtotal_cents, 8000);
        assert_eq!(placed.items[1].subtotal_cents, 10000);
        assert_eq!(placed.items[1].name_snapshot, "Wax coat");
    }

    #[tokio::test]
    async fn test_quantity_defaults_to_one() {
        let store = seeded_store();
        let placed = manager(&store)
            .create_order(order_cmd(vec![line("svc-wax", None)]))
            .await
            .unwrap();

        assert_eq!(placed.items[0].quantity, 1);
        assert_eq!(placed.order.total_cents, 5000);
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let store = seeded_store();
        let err = manager(&store)
            .create_order(order_cmd(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyOrder));
    }

    #[tokio::test]
    async fn test_unknown_service_rejected() {
        let store = seeded_store();
        let err = manager(&store)
            .create_order(order_cmd(vec![line("svc-ghost", None)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidService(_)));
    }

    #[tokio::test]
    async fn test_inactive_service_rejected() {
        let store = seeded_store();
        let mut svc = service_fixture("svc-retired", "Retired", 1000, 5);
        svc.is_active = false;
        store.add_service(svc);

        let err = manager(&store)
            .create_order(order_cmd(vec![line("svc-retired", None)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidService(_)));
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected() {
        let store = seeded_store();
        let err = manager(&store)
            .create_order(order_cmd(vec![line("svc-wax", Some(0))]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_catalog_change() {
        let store = seeded_store();
        let mgr = manager(&store);
        let placed = mgr
            .create_order(order_cmd(vec![line("svc-exterior", Some(1))]))
            .await
            .unwrap();

        store.set_service_price("svc-exterior", 999999);

        let items = mgr.order_items(&placed.order.id).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 8000);

        let stored = store.find_by_id(&placed.order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 8000);
    }

    #[tokio::test]
    async fn test_forward_walk_sets_timestamps_once() {
        let store = seeded_store();
        let mgr = manager(&store);
        let placed = mgr
            .create_order(order_cmd(vec![line("svc-exterior", None)]))
            .await
            .unwrap();
        let id = placed.order.id.clone();

        let in_progress = advance(&mgr, &id, OrderStatus::InProgress).await.unwrap();
        let started_at = in_progress.started_at.unwrap();

        // Re-invoking the same transition succeeds and leaves the
        // timestamp untouched.
        let again = advance(&mgr, &id, OrderStatus::InProgress).await.unwrap();
        assert_eq!(again.started_at.unwrap(), started_at);

        let done = mgr
            .advance_status(AdvanceStatus {
                order_id: id.clone(),
                target: OrderStatus::Done,
                payment_method: Some(PaymentMethod::Card),
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();
        let finished_at = done.finished_at.unwrap();
        assert_eq!(done.payment_method, Some(PaymentMethod::Card));

        let again = advance(&mgr, &id, OrderStatus::Done).await.unwrap();
        assert_eq!(again.finished_at.unwrap(), finished_at);

        let delivered = advance(&mgr, &id, OrderStatus::Delivered).await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(delivered.started_at.unwrap(), started_at);
        assert_eq!(delivered.finished_at.unwrap(), finished_at);
    }

    #[tokio::test]
    async fn test_skipping_states_rejected() {
        let store = seeded_store();
        let mgr = manager(&store);
        let placed = mgr
            .create_order(order_cmd(vec![line("svc-exterior", None)]))
            .await
            .unwrap();

        let err = advance(&mgr, &placed.order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered,
            }
        ));
    }

    #[tokio::test]
    async fn test_cancel_from_pending_and_in_progress() {
        let store = seeded_store();
        let mgr = manager(&store);

        let first = mgr
            .create_order(order_cmd(vec![line("svc-exterior", None)]))
            .await
            .unwrap();
        let cancelled = advance(&mgr, &first.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let second = mgr
            .create_order(CreateOrder {
                plate: "xyz-789".to_string(),
                ..order_cmd(vec![line("svc-wax", None)])
            })
            .await
            .unwrap();
        advance(&mgr, &second.order.id, OrderStatus::InProgress)
            .await
            .unwrap();
        let cancelled = advance(&mgr, &second.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_terminal_states_reject_transitions() {
        let store = seeded_store();
        let mgr = manager(&store);
        let placed = mgr
            .create_order(order_cmd(vec![line("svc-exterior", None)]))
            .await
            .unwrap();
        let id = placed.order.id.clone();

        advance(&mgr, &id, OrderStatus::Cancelled).await.unwrap();

        let err = advance(&mgr, &id, OrderStatus::InProgress).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));

        let err = advance(&mgr, &id, OrderStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_done_after_delivery_rejected() {
        let store = seeded_store();
        let mgr = manager(&store);
        let placed = mgr
            .create_order(order_cmd(vec![line("svc-exterior", None)]))
            .await
            .unwrap();
        let id = placed.order.id.clone();

        advance(&mgr, &id, OrderStatus::InProgress).await.unwrap();
        advance(&mgr, &id, OrderStatus::Done).await.unwrap();
        advance(&mgr, &id, OrderStatus::Delivered).await.unwrap();

        let err = advance(&mgr, &id, OrderStatus::Done).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_unknown_order_rejected() {
        let store = seeded_store();
        let err = advance(&manager(&store), "no-such-order", OrderStatus::InProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::OrderNotFound(_)));
    }
}
