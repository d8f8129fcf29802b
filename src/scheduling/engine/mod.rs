//! Greedy matching engine.
//!
//! [`compute_proposal`] is synchronous and side-effect-free: given an
//! immutable registry snapshot it may run on any thread without locking.

mod candidate;
mod matcher;

pub use matcher::{compute_assignments, compute_proposal};

use crate::scheduling::domain::SchedulingDomainError;

/// Default minimum bookable activity length.
pub const DEFAULT_MIN_ACTIVITY_MINUTES: i64 = 60;

/// Tunables for one matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    min_activity_minutes: i64,
}

impl MatchPolicy {
    /// Creates a policy with a validated minimum activity duration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidDuration`] when `minutes` is
    /// not positive.
    pub const fn new(minutes: i64) -> Result<Self, SchedulingDomainError> {
        if minutes <= 0 {
            return Err(SchedulingDomainError::InvalidDuration(minutes));
        }
        Ok(Self {
            min_activity_minutes: minutes,
        })
    }

    /// Returns the minimum bookable activity length in minutes.
    #[must_use]
    pub const fn min_activity_minutes(&self) -> i64 {
        self.min_activity_minutes
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_activity_minutes: DEFAULT_MIN_ACTIVITY_MINUTES,
        }
    }
}
