//! # parkwash-core: Pure Business Logic for ParkWash POS
//!
//! This crate is the heart of ParkWash POS, a point-of-sale system for a
//! combined vehicle-parking and car-wash business. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     ParkWash POS Architecture                       │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                Request Layer (out of scope)                   │  │
//! │  │   register entry ─► process exit ─► create order ─► advance   │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │            parkwash-engine (lifecycle managers)               │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │              ★ parkwash-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌────────────┐       │  │
//! │  │   │  types  │  │  money  │  │ tariff  │  │  codegen   │       │  │
//! │  │   │ Session │  │  Money  │  │ RateCard│  │ PK/WS codes│       │  │
//! │  │   │  Order  │  │         │  │ FeeCalc │  │            │       │  │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └────────────┘       │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (VehicleType, VehicleSession, Service, ServiceOrder)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`tariff`] - Parking fee calculation from a time interval and a rate card
//! - [`codegen`] - Human-readable code generation for sessions and orders
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic given its inputs
//!    (code generation consumes the clock and a RNG, nothing else)
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use parkwash_core::money::Money;
//! use parkwash_core::tariff::{compute_fee, RateCard, TariffPolicy};
//!
//! let rates = RateCard {
//!     hourly_rate: Money::from_cents(3000),
//!     fraction_price: Money::from_cents(1000),
//!     fraction_minutes: 15,
//!     daily_rate: None,
//! };
//!
//! let entered_at = Utc::now();
//! let exited_at = entered_at + Duration::minutes(70);
//!
//! // 70 minutes = 1 whole hour + ceil(10 / 15) fractions
//! let breakdown = compute_fee(entered_at, exited_at, &rates, TariffPolicy::Fractional).unwrap();
//! assert_eq!(breakdown.elapsed_minutes, 70);
//! assert_eq!(breakdown.fee.cents(), 4000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codegen;
pub mod error;
pub mod money;
pub mod tariff;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use parkwash_core::Money` instead of
// `use parkwash_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use tariff::{FeeBreakdown, RateCard, TariffPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum accepted length of a licence plate after trimming.
pub const MAX_PLATE_LEN: usize = 10;

/// Maximum quantity of a single service line in a wash order.
///
/// Prevents accidental over-ordering (e.g. typing 100 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 99;

/// Code prefix for parking sessions.
pub const SESSION_CODE_PREFIX: &str = "PK";

/// Code prefix for car-wash service orders.
pub const ORDER_CODE_PREFIX: &str = "WS";
