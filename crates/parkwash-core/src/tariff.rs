//! # Tariff Module
//!
//! Turns a time interval and a rate configuration into a billable amount.
//!
//! ## Billing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  FRACTIONAL TARIFF (canonical)                                      │
//! │                                                                     │
//! │  elapsed = ceil(interval / 1 minute)                                │
//! │                                                                     │
//! │  elapsed ≤ fraction_minutes  ──►  one fraction (minimum charge)     │
//! │                                                                     │
//! │  otherwise:                                                         │
//! │    whole_hours = elapsed / 60        ──►  whole_hours × hourly      │
//! │    remainder   = elapsed % 60        ──►  + ceil(remainder /        │
//! │                                             fraction_minutes)       │
//! │                                             × fraction_price        │
//! │                                                                     │
//! │  Example (hourly 3000, fraction 1000 / 15 min):                     │
//! │    10 min  → 1000        (within one fraction)                      │
//! │    60 min  → 3000        (one whole hour, no remainder)             │
//! │    70 min  → 3000 + 1000 (one hour + ceil(10/15) fractions)         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two non-equivalent tariff rules exist in this business domain. The
//! fractional rule above is the canonical one. The hourly rule with a
//! daily overflow survives as an explicit, separately-selected policy
//! ([`TariffPolicy::HourlyWithDailyOverflow`]); the two are never merged
//! and produce different totals for the same interval.
//!
//! All fee arithmetic is integer cents. The only rounding anywhere is the
//! ceil operations shown above.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Rate Card
// =============================================================================

/// The rate configuration a fee computation runs against.
///
/// Built either from a [`crate::types::VehicleType`] (catalog entry) or
/// from the snapshot fields of a [`crate::types::VehicleSession`]; billing
/// an open session always uses the session's own snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    /// Rate per whole parked hour.
    pub hourly_rate: Money,

    /// Flat price of one fraction (also the minimum charge).
    pub fraction_price: Money,

    /// Length of one fraction in minutes. Must be positive.
    pub fraction_minutes: i64,

    /// Rate per 24-hour period; only the daily-overflow policy reads it.
    pub daily_rate: Option<Money>,
}

// =============================================================================
// Tariff Policy
// =============================================================================

/// Which billing rule to apply.
///
/// Selected by deployment configuration, never inferred. A deployment
/// runs exactly one policy; switching policies does not rebill closed
/// sessions (their totals are already persisted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TariffPolicy {
    /// Whole hours at the hourly rate plus fractions for the remainder.
    /// Stays within one fraction bill exactly one fraction.
    Fractional,

    /// Hours rounded up, billed at the hourly rate; once the stay exceeds
    /// 8 hours the whole stay is rebilled at the daily rate times the
    /// number of started 24-hour periods.
    HourlyWithDailyOverflow,
}

impl Default for TariffPolicy {
    fn default() -> Self {
        TariffPolicy::Fractional
    }
}

// =============================================================================
// Fee Breakdown
// =============================================================================

/// The result of a fee computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeeBreakdown {
    /// Elapsed minutes, rounded up to the next whole minute.
    pub elapsed_minutes: i64,

    /// The billable amount.
    pub fee: Money,
}

// =============================================================================
// Fee Computation
// =============================================================================

/// Number of hours a stay may reach before the daily-overflow policy
/// switches from hourly billing to daily billing.
const DAILY_OVERFLOW_HOURS: i64 = 8;

/// Returns the billed minutes between entry and exit.
///
/// Minutes are rounded up: a stay of 61 seconds bills as 2 minutes.
/// Fails with [`CoreError::InvalidInterval`] when `exited_at` precedes
/// `entered_at`. A zero-length interval is valid and yields 0 minutes.
pub fn elapsed_minutes(
    entered_at: DateTime<Utc>,
    exited_at: DateTime<Utc>,
) -> CoreResult<i64> {
    let millis = (exited_at - entered_at).num_milliseconds();
    if millis < 0 {
        return Err(CoreError::InvalidInterval {
            entered_at,
            exited_at,
        });
    }
    Ok((millis + 59_999) / 60_000)
}

/// Computes the fee owed for a parking stay.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use parkwash_core::money::Money;
/// use parkwash_core::tariff::{compute_fee, RateCard, TariffPolicy};
///
/// let rates = RateCard {
///     hourly_rate: Money::from_cents(3000),
///     fraction_price: Money::from_cents(1000),
///     fraction_minutes: 15,
///     daily_rate: None,
/// };
/// let entry = Utc::now();
///
/// let b = compute_fee(entry, entry + Duration::minutes(10), &rates, TariffPolicy::Fractional).unwrap();
/// assert_eq!(b.fee.cents(), 1000);
/// ```
pub fn compute_fee(
    entered_at: DateTime<Utc>,
    exited_at: DateTime<Utc>,
    rates: &RateCard,
    policy: TariffPolicy,
) -> CoreResult<FeeBreakdown> {
    let elapsed = elapsed_minutes(entered_at, exited_at)?;

    let fee = match policy {
        TariffPolicy::Fractional => fractional_fee(elapsed, rates),
        TariffPolicy::HourlyWithDailyOverflow => hourly_daily_fee(elapsed, rates)?,
    };

    Ok(FeeBreakdown {
        elapsed_minutes: elapsed,
        fee,
    })
}

/// The canonical fractional tariff.
///
/// The `elapsed == fraction_minutes` boundary is inclusive on the low
/// side: exactly one fraction length charges exactly one fraction.
/// Zero-duration stays charge one fraction, never zero.
fn fractional_fee(elapsed: i64, rates: &RateCard) -> Money {
    // fraction_minutes below 1 would divide by zero; the catalog
    // validation rejects it, this clamp keeps the math total
    let fraction_minutes = rates.fraction_minutes.max(1);

    if elapsed <= fraction_minutes {
        return rates.fraction_price;
    }

    let whole_hours = elapsed / 60;
    let remainder = elapsed % 60;

    let mut fee = rates.hourly_rate.multiply_quantity(whole_hours);
    if remainder > 0 {
        let fractions = (remainder + fraction_minutes - 1) / fraction_minutes;
        fee += rates.fraction_price.multiply_quantity(fractions);
    }
    fee
}

/// The alternate hourly tariff with a daily overflow.
///
/// Hours are rounded up and billed at the hourly rate; a stay of more
/// than [`DAILY_OVERFLOW_HOURS`] hours is rebilled entirely at the daily
/// rate times the number of started 24-hour periods. Fails with
/// [`CoreError::MissingDailyRate`] when the overflow is reached and the
/// rate card has no daily rate.
fn hourly_daily_fee(elapsed: i64, rates: &RateCard) -> CoreResult<Money> {
    // Zero-duration stays bill one hour under this rule.
    let hours = ((elapsed + 59) / 60).max(1);

    if hours <= DAILY_OVERFLOW_HOURS {
        return Ok(rates.hourly_rate.multiply_quantity(hours));
    }

    let daily_rate = rates.daily_rate.ok_or(CoreError::MissingDailyRate)?;
    let days = (hours + 23) / 24;
    Ok(daily_rate.multiply_quantity(days))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn rates() -> RateCard {
        RateCard {
            hourly_rate: Money::from_cents(3000),
            fraction_price: Money::from_cents(1000),
            fraction_minutes: 15,
            daily_rate: Some(Money::from_cents(15000)),
        }
    }

    fn entry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn fee_after(minutes: i64, policy: TariffPolicy) -> FeeBreakdown {
        compute_fee(entry(), entry() + Duration::minutes(minutes), &rates(), policy).unwrap()
    }

    #[test]
    fn test_elapsed_rounds_up() {
        let t = entry();
        assert_eq!(elapsed_minutes(t, t).unwrap(), 0);
        assert_eq!(elapsed_minutes(t, t + Duration::seconds(1)).unwrap(), 1);
        assert_eq!(elapsed_minutes(t, t + Duration::seconds(61)).unwrap(), 2);
        assert_eq!(elapsed_minutes(t, t + Duration::minutes(60)).unwrap(), 60);
    }

    #[test]
    fn test_negative_interval_fails() {
        let t = entry();
        let err = compute_fee(
            t,
            t - Duration::milliseconds(1),
            &rates(),
            TariffPolicy::Fractional,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInterval { .. }));
    }

    #[test]
    fn test_zero_duration_charges_one_fraction() {
        let b = fee_after(0, TariffPolicy::Fractional);
        assert_eq!(b.elapsed_minutes, 0);
        assert_eq!(b.fee.cents(), 1000);
    }

    #[test]
    fn test_fraction_boundary_inclusive() {
        // Exactly one fraction length charges exactly one fraction.
        assert_eq!(fee_after(15, TariffPolicy::Fractional).fee.cents(), 1000);
        // One minute past the boundary starts hour/fraction accounting.
        assert_eq!(fee_after(16, TariffPolicy::Fractional).fee.cents(), 2000);
    }

    #[test]
    fn test_fractional_examples_from_rate_sheet() {
        // 10 min within the first fraction
        assert_eq!(fee_after(10, TariffPolicy::Fractional).fee.cents(), 1000);
        // exactly one hour: no remainder fractions
        assert_eq!(fee_after(60, TariffPolicy::Fractional).fee.cents(), 3000);
        // 70 min: one hour + ceil(10/15) = 1 fraction
        assert_eq!(fee_after(70, TariffPolicy::Fractional).fee.cents(), 4000);
        // 2h31: two hours + ceil(31/15) = 3 fractions
        assert_eq!(fee_after(151, TariffPolicy::Fractional).fee.cents(), 9000);
    }

    #[test]
    fn test_fractional_monotone_in_duration() {
        let mut last = 0;
        for minutes in 0..300 {
            let fee = fee_after(minutes, TariffPolicy::Fractional).fee.cents();
            assert!(
                fee >= last,
                "fee decreased at {} minutes: {} < {}",
                minutes,
                fee,
                last
            );
            last = fee;
        }
    }

    #[test]
    fn test_daily_overflow_hourly_region() {
        // 3h exactly: 3 × hourly
        assert_eq!(
            fee_after(180, TariffPolicy::HourlyWithDailyOverflow).fee.cents(),
            9000
        );
        // 2h10 rounds up to 3 hours
        assert_eq!(
            fee_after(130, TariffPolicy::HourlyWithDailyOverflow).fee.cents(),
            9000
        );
        // zero-duration bills one hour under this rule
        assert_eq!(
            fee_after(0, TariffPolicy::HourlyWithDailyOverflow).fee.cents(),
            3000
        );
    }

    #[test]
    fn test_daily_overflow_switches_to_daily() {
        // 8h is the last hourly-billed stay
        assert_eq!(
            fee_after(480, TariffPolicy::HourlyWithDailyOverflow).fee.cents(),
            24000
        );
        // 9h: whole stay rebilled at 1 × daily
        assert_eq!(
            fee_after(540, TariffPolicy::HourlyWithDailyOverflow).fee.cents(),
            15000
        );
        // 30h: 2 started 24-hour periods
        assert_eq!(
            fee_after(1800, TariffPolicy::HourlyWithDailyOverflow).fee.cents(),
            30000
        );
    }

    #[test]
    fn test_daily_overflow_requires_daily_rate() {
        let mut no_daily = rates();
        no_daily.daily_rate = None;

        let err = compute_fee(
            entry(),
            entry() + Duration::hours(9),
            &no_daily,
            TariffPolicy::HourlyWithDailyOverflow,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::MissingDailyRate));

        // Under the overflow threshold the daily rate is never consulted.
        let ok = compute_fee(
            entry(),
            entry() + Duration::hours(2),
            &no_daily,
            TariffPolicy::HourlyWithDailyOverflow,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_policies_diverge() {
        // The two rules are not interchangeable: same interval, different
        // totals.
        let fractional = fee_after(70, TariffPolicy::Fractional).fee.cents();
        let hourly = fee_after(70, TariffPolicy::HourlyWithDailyOverflow).fee.cents();
        assert_eq!(fractional, 4000);
        assert_eq!(hourly, 6000);
    }
}
