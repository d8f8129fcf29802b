//! Monetary amounts in integer minor units.
//!
//! All budget and rate arithmetic is checked integer math on cents; the
//! scheduling core never touches floating point, which keeps matching output
//! bit-identical across runs and platforms.

use super::SchedulingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in one hour, used to convert hourly rates to booked-slot costs.
const MINUTES_PER_HOUR: i64 = 60;

/// A non-negative monetary amount in minor units (cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::NegativeAmount`] when `cents` is
    /// negative.
    pub const fn from_cents(cents: i64) -> Result<Self, SchedulingDomainError> {
        if cents < 0 {
            return Err(SchedulingDomainError::NegativeAmount(cents));
        }
        Ok(Self(cents))
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Adds another amount.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::AmountOverflow`] when the sum exceeds
    /// the cents representation.
    pub const fn checked_add(self, other: Self) -> Result<Self, SchedulingDomainError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(SchedulingDomainError::AmountOverflow),
        }
    }

    /// Subtracts another amount.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::NegativeAmount`] when the result
    /// would drop below zero.
    pub const fn checked_sub(self, other: Self) -> Result<Self, SchedulingDomainError> {
        let difference = self.0 - other.0;
        if difference < 0 {
            return Err(SchedulingDomainError::NegativeAmount(difference));
        }
        Ok(Self(difference))
    }

    /// Computes the cost of booking this hourly rate for `minutes`.
    ///
    /// The product is taken in cents before dividing by sixty, so sub-hour
    /// slots cost a proportional share of the hourly rate.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidDuration`] for a non-positive
    /// duration and [`SchedulingDomainError::AmountOverflow`] when the
    /// product exceeds the cents representation.
    pub const fn cost_for_minutes(self, minutes: i64) -> Result<Self, SchedulingDomainError> {
        if minutes <= 0 {
            return Err(SchedulingDomainError::InvalidDuration(minutes));
        }
        match self.0.checked_mul(minutes) {
            Some(product) => Ok(Self(product / MINUTES_PER_HOUR)),
            None => Err(SchedulingDomainError::AmountOverflow),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let fraction = self.0 % 100;
        write!(f, "{whole}.{fraction:02}")
    }
}
