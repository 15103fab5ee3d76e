//! # Error Types
//!
//! Domain-specific error types for parkwash-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  parkwash-core errors (this file)                                   │
//! │  ├── CoreError        - Tariff/domain calculation failures          │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  parkwash-engine errors (separate crate)                            │
//! │  └── EngineError      - Lifecycle rule violations                   │
//! │                                                                     │
//! │  parkwash-db errors (separate crate)                                │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → EngineError → response layer   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (plate, timestamps, field name)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent calculation failures in the pure domain layer.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The exit timestamp precedes the entry timestamp.
    ///
    /// ## When This Occurs
    /// - Clock skew between the device registering entry and the one
    ///   processing exit
    /// - A caller passing swapped arguments
    #[error("invalid interval: exit {exited_at} is before entry {entered_at}")]
    InvalidInterval {
        entered_at: DateTime<Utc>,
        exited_at: DateTime<Utc>,
    },

    /// The daily-overflow tariff policy was selected but the rate card
    /// carries no daily rate.
    #[error("rate card has no daily rate for the daily-overflow tariff")]
    MissingDailyRate,

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid UUID, disallowed characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
