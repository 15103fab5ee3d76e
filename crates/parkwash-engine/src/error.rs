//! # Engine Error Types
//!
//! Every lifecycle rule violation the engine can surface.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  StoreError (port conflict / backend failure)                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  EngineError (this module) ← adds lifecycle context                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Response layer maps each kind to a user-facing message             │
//! │       and decides retry policy; the engine never retries beyond     │
//! │       the bounded code-collision loop                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All variants are recoverable and user-facing; none should crash the
//! process.

use thiserror::Error;

use parkwash_core::{CoreError, OrderStatus, ValidationError};

use crate::store::StoreError;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The vehicle type is unknown or inactive.
    #[error("vehicle type not found or inactive: {0}")]
    InvalidVehicleType(String),

    /// A referenced service is unknown or inactive.
    #[error("service not found or inactive: {0}")]
    InvalidService(String),

    /// An order was created with no line items.
    #[error("order must contain at least one line item")]
    EmptyOrder,

    /// An Active session already exists for the plate.
    ///
    /// ## When This Occurs
    /// - Entry registered twice without an intervening exit
    /// - Two gates racing on the same plate (the storage unique index
    ///   rejects the loser)
    #[error("an active session already exists for plate {plate}")]
    DuplicateActiveSession { plate: String },

    /// No Active session matches the code or plate.
    ///
    /// Also raised when exiting an already-Paid session: the lookup
    /// filters on Active, so a second exit never silently recomputes.
    #[error("no active session found for {0}")]
    SessionNotFound(String),

    /// The order id is unknown.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// The requested order status change is not an allowed transition.
    #[error("cannot transition order from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The generated code collided on every attempt.
    #[error("could not allocate a unique code after {attempts} attempts")]
    CodeExhausted { attempts: u32 },

    /// Another request mutated the record between our read and write.
    #[error("record was modified concurrently, retry the operation")]
    ConcurrentModification,

    /// Tariff or domain calculation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Input validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage backend failure passed through to the caller.
    #[error("storage error: {0}")]
    Store(StoreError),
}

/// Conflicts that carry lifecycle meaning (duplicate plate, duplicate
/// code) are matched explicitly at the call sites that know the context;
/// everything else converts here.
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConcurrentModification => EngineError::ConcurrentModification,
            other => EngineError::Store(other),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
