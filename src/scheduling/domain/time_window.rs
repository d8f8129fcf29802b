//! Half-open time windows used for availability and bookings.

use super::SchedulingDomainError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a validated time window.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::InvalidTimeWindow`] when `end` is not
    /// strictly after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SchedulingDomainError> {
        if end <= start {
            return Err(SchedulingDomainError::InvalidTimeWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the window length in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Returns whether the two windows share any time.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the shared interval of two windows, when one exists.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Returns whether `other` lies entirely within this window.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the leading `minutes`-long slice of this window.
    ///
    /// Returns `None` when the window is shorter than the requested slice or
    /// `minutes` is not positive.
    #[must_use]
    pub fn leading_slice(&self, minutes: i64) -> Option<Self> {
        if minutes <= 0 {
            return None;
        }
        let end = self.start + Duration::minutes(minutes);
        if end > self.end {
            return None;
        }
        Some(Self {
            start: self.start,
            end,
        })
    }

    /// Returns whether the window has ended at the given instant.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end <= now
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
