//! # Order Repository
//!
//! Database operations for wash orders and their line items.
//!
//! An order and its items are inserted in one transaction so the
//! total-equals-sum-of-subtotals invariant can never be observed broken.
//! Status transitions are guarded updates on the expected current
//! status.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use parkwash_core::{OrderStatus, ServiceOrder, ServiceOrderItem};

/// Every column of service_orders, in entity field order.
const ORDER_COLUMNS: &str = r#"
    id, code, plate, vehicle_type_id, status,
    total_cents, estimated_minutes,
    created_at, started_at, finished_at,
    payment_method, notes, created_by_user_id, updated_at
"#;

/// Repository for wash order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ServiceOrder>> {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM service_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Inserts an order with its line items in one transaction.
    ///
    /// The code unique index rejects duplicates; the violation surfaces
    /// as `DbError::UniqueViolation` with the column in `field`.
    pub async fn insert(
        &self,
        order: &ServiceOrder,
        items: &[ServiceOrderItem],
    ) -> DbResult<()> {
        debug!(id = %order.id, code = %order.code, items = items.len(), "inserting order");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO service_orders (
                id, code, plate, vehicle_type_id, status,
                total_cents, estimated_minutes,
                created_at, started_at, finished_at,
                payment_method, notes, created_by_user_id, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7,
                ?8, ?9, ?10,
                ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.code)
        .bind(&order.plate)
        .bind(&order.vehicle_type_id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(order.estimated_minutes)
        .bind(order.created_at)
        .bind(order.started_at)
        .bind(order.finished_at)
        .bind(order.payment_method)
        .bind(&order.notes)
        .bind(&order.created_by_user_id)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO service_order_items (
                    id, order_id, service_id,
                    name_snapshot, unit_price_cents, duration_minutes,
                    quantity, subtotal_cents, created_at
                ) VALUES (
                    ?1, ?2, ?3,
                    ?4, ?5, ?6,
                    ?7, ?8, ?9
                )
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.service_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.duration_minutes)
            .bind(item.quantity)
            .bind(item.subtotal_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets all line items for an order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<ServiceOrderItem>> {
        let items = sqlx::query_as::<_, ServiceOrderItem>(
            r#"
            SELECT
                id, order_id, service_id,
                name_snapshot, unit_price_cents, duration_minutes,
                quantity, subtotal_cents, created_at
            FROM service_order_items
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Writes a status transition, guarded on the expected current
    /// status. Zero rows affected means another request transitioned the
    /// order first.
    pub async fn apply_transition(
        &self,
        order: &ServiceOrder,
        expected: OrderStatus,
    ) -> DbResult<()> {
        debug!(id = %order.id, from = ?expected, to = ?order.status, "applying order transition");

        let result = sqlx::query(
            r#"
            UPDATE service_orders SET
                status = ?2,
                started_at = ?3,
                finished_at = ?4,
                payment_method = ?5,
                updated_at = ?6
            WHERE id = ?1 AND status = ?7
            "#,
        )
        .bind(&order.id)
        .bind(order.status)
        .bind(order.started_at)
        .bind(order.finished_at)
        .bind(order.payment_method)
        .bind(order.updated_at)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", &order.id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
