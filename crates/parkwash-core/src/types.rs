//! # Domain Types
//!
//! Core domain types used throughout ParkWash POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐   │
//! │  │  VehicleType    │   │  VehicleSession  │   │    Service      │   │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)      │   │
//! │  │  hourly_rate    │──►│  code (PK…)      │   │  price_cents    │   │
//! │  │  fraction_price │   │  plate           │   │  duration_min   │   │
//! │  │  fraction_min   │   │  rate snapshots  │   └────────┬────────┘   │
//! │  └─────────────────┘   │  status          │            │            │
//! │                        └──────────────────┘            ▼            │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐   │
//! │  │  SessionStatus  │   │  ServiceOrder    │   │ServiceOrderItem │   │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │   │
//! │  │  Active         │   │  code (WS…)      │──►│  price snapshot │   │
//! │  │  Paid           │   │  total_cents     │   │  subtotal       │   │
//! │  │  Cancelled      │   │  status          │   │  quantity       │   │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every aggregate has:
//! - `id`: UUID v4, immutable, used for database relations
//! - `code`: generated human-scannable identifier (barcode/order number)
//!
//! ## Snapshot Pattern
//! Rate and price fields are copied from the catalog into sessions and
//! order items at creation time. Later catalog edits never change what an
//! open session or an existing order will bill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tariff::RateCard;

// =============================================================================
// Vehicle Type
// =============================================================================

/// A category of vehicle with its parking tariff rates.
///
/// Immutable reference data: created at setup, read by sessions at entry
/// time. Sessions copy the rate fields rather than referencing them live.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VehicleType {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("Car", "Motorcycle", "Truck").
    pub name: String,

    /// Rate charged per whole parked hour, in cents.
    pub hourly_rate_cents: i64,

    /// Flat price of one fraction (the minimum billable unit), in cents.
    pub fraction_price_cents: i64,

    /// Length of one fraction in minutes.
    pub fraction_minutes: i64,

    /// Rate per 24-hour period, in cents. Only consulted by the
    /// daily-overflow tariff policy.
    pub daily_rate_cents: Option<i64>,

    /// Whether this type can be assigned to new sessions (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl VehicleType {
    /// Returns the tariff rate card for this vehicle type.
    pub fn rate_card(&self) -> RateCard {
        RateCard {
            hourly_rate: Money::from_cents(self.hourly_rate_cents),
            fraction_price: Money::from_cents(self.fraction_price_cents),
            fraction_minutes: self.fraction_minutes,
            daily_rate: self.daily_rate_cents.map(Money::from_cents),
        }
    }
}

// =============================================================================
// Session Status
// =============================================================================

/// The status of a parking session.
///
/// Transitions: `Active → Paid` (normal exit) or `Active → Cancelled`
/// (administrative). Paid and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Vehicle is in the lot.
    Active,
    /// Vehicle has left and the stay was billed.
    Paid,
    /// Session was voided by an administrator.
    Cancelled,
}

impl SessionStatus {
    /// Paid and Cancelled sessions accept no further mutation.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Paid | SessionStatus::Cancelled)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Active
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Bank transfer / mobile wallet.
    Transfer,
}

// =============================================================================
// Vehicle Session
// =============================================================================

/// One parking stay for a vehicle, from entry to exit or cancellation.
///
/// Created on entry with a snapshot of the vehicle type's rates; mutated
/// exactly once on exit (exit timestamp, totals, status Paid) or by an
/// administrative cancellation. At most one Active session may exist per
/// plate at any time; the storage layer enforces this with a conflict-
/// detecting write.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VehicleSession {
    pub id: String,

    /// Generated human-scannable code (ticket barcode), unique.
    pub code: String,

    /// Licence plate, stored uppercased.
    pub plate: String,

    /// Reference to the vehicle type catalog entry.
    pub vehicle_type_id: String,

    /// Hourly rate at entry time (frozen).
    pub hourly_rate_cents: i64,

    /// Fraction price at entry time (frozen).
    pub fraction_price_cents: i64,

    /// Fraction length at entry time (frozen).
    pub fraction_minutes: i64,

    /// Daily rate at entry time (frozen), when the type carries one.
    pub daily_rate_cents: Option<i64>,

    pub status: SessionStatus,

    #[ts(as = "String")]
    pub entered_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub exited_at: Option<DateTime<Utc>>,

    /// Billed minutes, set on exit.
    pub total_minutes: Option<i64>,

    /// Billed fee in cents, set on exit.
    pub total_cents: Option<i64>,

    /// How the stay was paid, set on exit.
    pub payment_method: Option<PaymentMethod>,

    /// User who registered the entry.
    pub entry_user_id: String,

    /// User who processed the exit or cancellation.
    pub exit_user_id: Option<String>,

    /// Optional vehicle owner contact details taken at the gate.
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl VehicleSession {
    /// Returns the rate card snapshotted into this session at entry.
    pub fn rate_card(&self) -> RateCard {
        RateCard {
            hourly_rate: Money::from_cents(self.hourly_rate_cents),
            fraction_price: Money::from_cents(self.fraction_price_cents),
            fraction_minutes: self.fraction_minutes,
            daily_rate: self.daily_rate_cents.map(Money::from_cents),
        }
    }

    /// Returns the billed fee as Money, if the session has been billed.
    #[inline]
    pub fn total(&self) -> Option<Money> {
        self.total_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Service
// =============================================================================

/// A car-wash service offered in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("Exterior wash", "Full detail").
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Estimated duration in minutes.
    pub duration_minutes: i64,

    /// Whether this service can be ordered (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a car-wash service order.
///
/// Transitions are monotonic forward:
/// `Pending → InProgress → Done → Delivered`, with `Cancelled` reachable
/// from Pending or InProgress. Delivered and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, work not started.
    Pending,
    /// Wash in progress.
    InProgress,
    /// Work finished, vehicle awaiting pickup.
    Done,
    /// Vehicle handed back to the customer.
    Delivered,
    /// Order was cancelled before completion.
    Cancelled,
}

impl OrderStatus {
    /// Delivered and Cancelled orders accept no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Service Order
// =============================================================================

/// One car-wash engagement for a vehicle, from creation to delivery or
/// cancellation.
///
/// `total_cents` equals the sum of line-item subtotals at creation time
/// and is never recomputed; catalog price changes do not retroactively
/// affect existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ServiceOrder {
    pub id: String,

    /// Generated human-scannable order number, unique.
    pub code: String,

    /// Licence plate, stored uppercased.
    pub plate: String,

    /// Reference to the vehicle type catalog entry.
    pub vehicle_type_id: String,

    pub status: OrderStatus,

    /// Sum of line-item subtotals at creation time, in cents.
    pub total_cents: i64,

    /// Sum of per-line estimated durations, in minutes.
    pub estimated_minutes: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Set the first time the order enters InProgress.
    #[ts(as = "Option<String>")]
    pub started_at: Option<DateTime<Utc>>,

    /// Set the first time the order enters Done or Delivered.
    #[ts(as = "Option<String>")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Recorded when the order enters Done with a method supplied.
    pub payment_method: Option<PaymentMethod>,

    pub notes: Option<String>,

    /// User who created the order.
    pub created_by_user_id: String,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Service Order Item
// =============================================================================

/// A line item in a service order.
/// Uses the snapshot pattern to freeze service data at order time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ServiceOrderItem {
    pub id: String,
    pub order_id: String,
    pub service_id: String,

    /// Service name at order time (frozen).
    pub name_snapshot: String,

    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,

    /// Estimated duration in minutes at order time (frozen).
    pub duration_minutes: i64,

    /// Quantity ordered (defaults to 1 at the command layer).
    pub quantity: i64,

    /// Line subtotal (unit_price × quantity).
    pub subtotal_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ServiceOrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn test_session_status_terminal() {
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Paid.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(!OrderStatus::Done.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Active).unwrap(),
            "\"active\""
        );
    }

    #[test]
    fn test_vehicle_type_rate_card() {
        let now = Utc::now();
        let vt = VehicleType {
            id: "vt-1".to_string(),
            name: "Car".to_string(),
            hourly_rate_cents: 3000,
            fraction_price_cents: 1000,
            fraction_minutes: 15,
            daily_rate_cents: Some(15000),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let card = vt.rate_card();
        assert_eq!(card.hourly_rate.cents(), 3000);
        assert_eq!(card.fraction_price.cents(), 1000);
        assert_eq!(card.fraction_minutes, 15);
        assert_eq!(card.daily_rate.map(|m| m.cents()), Some(15000));
    }
}
