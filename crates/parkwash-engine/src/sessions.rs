//! # Vehicle Session Manager
//!
//! Owns the parking-session state machine.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Session Lifecycle                               │
//! │                                                                     │
//! │  1. REGISTER ENTRY                                                  │
//! │     └── register_entry() → Session { status: Active }               │
//! │         • rejects a plate that already has an Active session        │
//! │         • snapshots the vehicle type's rates into the session       │
//! │         • allocates a PK… code (retried on collision)               │
//! │                                                                     │
//! │  2. PROCESS EXIT                                                    │
//! │     └── process_exit() → Session { status: Paid }                   │
//! │         • finds the Active session by code, then by plate           │
//! │         • bills the snapshot rates for the elapsed time             │
//! │         • one guarded mutation: exited_at, totals, payment          │
//! │                                                                     │
//! │  3. (ADMIN) CANCEL                                                  │
//! │     └── cancel_session() → Session { status: Cancelled }            │
//! │                                                                     │
//! │  Paid and Cancelled are terminal; a second exit finds no Active     │
//! │  session and fails with SessionNotFound.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use parkwash_core::codegen;
use parkwash_core::tariff;
use parkwash_core::validation::normalize_plate;
use parkwash_core::{PaymentMethod, SessionStatus, VehicleSession, SESSION_CODE_PREFIX};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::store::{CatalogStore, SessionStore, StoreError};

// =============================================================================
// Commands
// =============================================================================

/// Command: a vehicle arrived at the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub plate: String,
    pub vehicle_type_id: String,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub notes: Option<String>,
    /// User registering the entry.
    pub user_id: String,
}

/// Command: a vehicle is leaving and pays for its stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessExit {
    /// Ticket code (preferred) or plate of the departing vehicle.
    pub key: String,
    pub payment_method: PaymentMethod,
    /// User processing the exit.
    pub user_id: String,
}

/// Command: an administrator voids an open session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelSession {
    /// Ticket code or plate of the session to void.
    pub key: String,
    pub reason: Option<String>,
    /// Administrator performing the cancellation.
    pub user_id: String,
}

// =============================================================================
// Manager
// =============================================================================

/// Drives parking sessions from entry to close-out.
#[derive(Clone)]
pub struct VehicleSessionManager {
    sessions: Arc<dyn SessionStore>,
    catalog: Arc<dyn CatalogStore>,
    config: EngineConfig,
}

impl VehicleSessionManager {
    /// Creates a manager over the given stores.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        catalog: Arc<dyn CatalogStore>,
        config: EngineConfig,
    ) -> Self {
        VehicleSessionManager {
            sessions,
            catalog,
            config,
        }
    }

    /// Registers a vehicle entering the lot.
    ///
    /// Fails with `InvalidVehicleType` for an unknown or inactive type
    /// and with `DuplicateActiveSession` when the plate already has an
    /// open session. The duplicate check runs up front for a precise
    /// error, and the storage unique index re-checks it at write time;
    /// under concurrency the index result wins.
    pub async fn register_entry(&self, cmd: RegisterEntry) -> EngineResult<VehicleSession> {
        let plate = normalize_plate(&cmd.plate)?;
        debug!(plate = %plate, vehicle_type_id = %cmd.vehicle_type_id, "register_entry");

        let vehicle_type = self
            .catalog
            .vehicle_type(&cmd.vehicle_type_id)
            .await?
            .filter(|vt| vt.is_active)
            .ok_or_else(|| EngineError::InvalidVehicleType(cmd.vehicle_type_id.clone()))?;

        if self.sessions.find_active_by_plate(&plate).await?.is_some() {
            return Err(EngineError::DuplicateActiveSession { plate });
        }

        let now = Utc::now();
        let mut session = VehicleSession {
            id: Uuid::new_v4().to_string(),
            code: codegen::generate(SESSION_CODE_PREFIX),
            plate: plate.clone(),
            vehicle_type_id: vehicle_type.id.clone(),
            // Rate snapshot: later catalog edits never touch this stay.
            hourly_rate_cents: vehicle_type.hourly_rate_cents,
            fraction_price_cents: vehicle_type.fraction_price_cents,
            fraction_minutes: vehicle_type.fraction_minutes,
            daily_rate_cents: vehicle_type.daily_rate_cents,
            status: SessionStatus::Active,
            entered_at: now,
            exited_at: None,
            total_minutes: None,
            total_cents: None,
            payment_method: None,
            entry_user_id: cmd.user_id,
            exit_user_id: None,
            owner_name: cmd.owner_name,
            owner_phone: cmd.owner_phone,
            notes: cmd.notes,
            created_at: now,
            updated_at: now,
        };

        let attempts = self.config.max_code_retries.max(1);
        for attempt in 1..=attempts {
            match self.sessions.insert(&session).await {
                Ok(()) => {
                    info!(
                        session_id = %session.id,
                        code = %session.code,
                        plate = %session.plate,
                        "entry registered"
                    );
                    return Ok(session);
                }
                Err(StoreError::DuplicateActiveSession) => {
                    return Err(EngineError::DuplicateActiveSession { plate });
                }
                Err(StoreError::DuplicateCode) if attempt < attempts => {
                    warn!(code = %session.code, attempt, "code collision, regenerating");
                    session.code = codegen::generate(SESSION_CODE_PREFIX);
                }
                Err(StoreError::DuplicateCode) => {
                    return Err(EngineError::CodeExhausted { attempts });
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(EngineError::CodeExhausted { attempts })
    }

    /// Processes a vehicle exit: bills the stay and closes the session.
    ///
    /// The lookup filters on Active status, so re-invoking on an
    /// already-Paid session fails with `SessionNotFound` rather than
    /// recomputing the fee. The mutation itself is guarded; losing the
    /// race to another exit surfaces `ConcurrentModification`.
    pub async fn process_exit(&self, cmd: ProcessExit) -> EngineResult<VehicleSession> {
        // Codes and plates are both stored uppercased.
        let key = cmd.key.trim().to_uppercase();
        debug!(key = %key, "process_exit");

        let mut session = self
            .sessions
            .find_active_by_code_or_plate(&key)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(key.clone()))?;

        let now = Utc::now();
        let breakdown = tariff::compute_fee(
            session.entered_at,
            now,
            &session.rate_card(),
            self.config.tariff_policy,
        )?;

        session.exited_at = Some(now);
        session.total_minutes = Some(breakdown.elapsed_minutes);
        session.total_cents = Some(breakdown.fee.cents());
        session.payment_method = Some(cmd.payment_method);
        session.exit_user_id = Some(cmd.user_id);
        session.status = SessionStatus::Paid;
        session.updated_at = now;

        self.sessions.complete_exit(&session).await?;

        info!(
            session_id = %session.id,
            plate = %session.plate,
            minutes = breakdown.elapsed_minutes,
            fee_cents = breakdown.fee.cents(),
            "exit processed"
        );
        Ok(session)
    }

    /// Administratively voids an open session without billing it.
    pub async fn cancel_session(&self, cmd: CancelSession) -> EngineResult<VehicleSession> {
        let key = cmd.key.trim().to_uppercase();
        debug!(key = %key, "cancel_session");

        let mut session = self
            .sessions
            .find_active_by_code_or_plate(&key)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(key.clone()))?;

        let now = Utc::now();
        session.status = SessionStatus::Cancelled;
        session.exited_at = Some(now);
        session.exit_user_id = Some(cmd.user_id);
        if let Some(reason) = cmd.reason {
            session.notes = Some(match session.notes.take() {
                Some(notes) => format!("{} | cancelled: {}", notes, reason),
                None => format!("cancelled: {}", reason),
            });
        }
        session.updated_at = now;

        self.sessions.cancel(&session).await?;

        info!(session_id = %session.id, plate = %session.plate, "session cancelled");
        Ok(session)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
