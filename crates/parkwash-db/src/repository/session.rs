//! # Session Repository
//!
//! Database operations for parking sessions.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  INSERT                                                             │
//! │    two unique indexes stand guard:                                  │
//! │    • uq_vehicle_sessions_code          → duplicate ticket code      │
//! │    • uq_vehicle_sessions_active_plate  → second Active session      │
//! │      (partial index, WHERE status = 'active')                       │
//! │                                                                     │
//! │  UPDATE (exit / cancel)                                             │
//! │    guarded: WHERE id = ? AND status = 'active'                      │
//! │    zero rows affected = another request already closed the session  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use parkwash_core::VehicleSession;

/// Every column of vehicle_sessions, in entity field order.
const SESSION_COLUMNS: &str = r#"
    id, code, plate, vehicle_type_id,
    hourly_rate_cents, fraction_price_cents, fraction_minutes, daily_rate_cents,
    status, entered_at, exited_at, total_minutes, total_cents,
    payment_method, entry_user_id, exit_user_id,
    owner_name, owner_phone, notes, created_at, updated_at
"#;

/// Repository for parking session database operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<VehicleSession>> {
        let session = sqlx::query_as::<_, VehicleSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM vehicle_sessions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Finds the Active session for a plate, if any.
    pub async fn find_active_by_plate(&self, plate: &str) -> DbResult<Option<VehicleSession>> {
        let session = sqlx::query_as::<_, VehicleSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM vehicle_sessions \
             WHERE plate = ?1 AND status = 'active'"
        ))
        .bind(plate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Finds the Active session whose code equals the key.
    pub async fn find_active_by_code(&self, code: &str) -> DbResult<Option<VehicleSession>> {
        let session = sqlx::query_as::<_, VehicleSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM vehicle_sessions \
             WHERE code = ?1 AND status = 'active'"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Inserts a session.
    ///
    /// The unique indexes reject duplicate codes and a second Active
    /// session for the plate; both surface as `DbError::UniqueViolation`
    /// with the offending column in `field`.
    pub async fn insert(&self, session: &VehicleSession) -> DbResult<()> {
        debug!(id = %session.id, code = %session.code, plate = %session.plate, "inserting session");

        sqlx::query(
            r#"
            INSERT INTO vehicle_sessions (
                id, code, plate, vehicle_type_id,
                hourly_rate_cents, fraction_price_cents, fraction_minutes, daily_rate_cents,
                status, entered_at, exited_at, total_minutes, total_cents,
                payment_method, entry_user_id, exit_user_id,
                owner_name, owner_phone, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16,
                ?17, ?18, ?19, ?20, ?21
            )
            "#,
        )
        .bind(&session.id)
        .bind(&session.code)
        .bind(&session.plate)
        .bind(&session.vehicle_type_id)
        .bind(session.hourly_rate_cents)
        .bind(session.fraction_price_cents)
        .bind(session.fraction_minutes)
        .bind(session.daily_rate_cents)
        .bind(session.status)
        .bind(session.entered_at)
        .bind(session.exited_at)
        .bind(session.total_minutes)
        .bind(session.total_cents)
        .bind(session.payment_method)
        .bind(&session.entry_user_id)
        .bind(&session.exit_user_id)
        .bind(&session.owner_name)
        .bind(&session.owner_phone)
        .bind(&session.notes)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the close-out mutation (exit or cancellation).
    ///
    /// Guarded on the session still being Active; zero rows affected
    /// means another request closed it first.
    pub async fn close_out(&self, session: &VehicleSession) -> DbResult<()> {
        debug!(id = %session.id, status = ?session.status, "closing session");

        let result = sqlx::query(
            r#"
            UPDATE vehicle_sessions SET
                status = ?2,
                exited_at = ?3,
                total_minutes = ?4,
                total_cents = ?5,
                payment_method = ?6,
                exit_user_id = ?7,
                notes = ?8,
                updated_at = ?9
            WHERE id = ?1 AND status = 'active'
            "#,
        )
        .bind(&session.id)
        .bind(session.status)
        .bind(session.exited_at)
        .bind(session.total_minutes)
        .bind(session.total_cents)
        .bind(session.payment_method)
        .bind(&session.exit_user_id)
        .bind(&session.notes)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Active session", &session.id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
