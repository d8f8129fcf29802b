//! Tourist request aggregate.

use super::{Money, Tag, TimeWindow, TouristId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A tourist's published scheduling request.
///
/// Immutable once published; a newer request with the same `tourist_id`
/// supersedes it (last-write-wins in the registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouristRequest {
    tourist_id: TouristId,
    availability: Vec<TimeWindow>,
    budget: Money,
    preferences: BTreeSet<Tag>,
    published_at: DateTime<Utc>,
}

impl TouristRequest {
    /// Creates a request stamped with the current clock time.
    #[must_use]
    pub fn new(
        tourist_id: TouristId,
        availability: Vec<TimeWindow>,
        budget: Money,
        preferences: BTreeSet<Tag>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            tourist_id,
            availability,
            budget,
            preferences,
            published_at: clock.utc(),
        }
    }

    /// Returns the tourist identifier.
    #[must_use]
    pub const fn tourist_id(&self) -> &TouristId {
        &self.tourist_id
    }

    /// Returns the availability windows as published.
    #[must_use]
    pub fn availability(&self) -> &[TimeWindow] {
        &self.availability
    }

    /// Returns the total budget.
    #[must_use]
    pub const fn budget(&self) -> Money {
        self.budget
    }

    /// Returns the preference tags.
    #[must_use]
    pub const fn preferences(&self) -> &BTreeSet<Tag> {
        &self.preferences
    }

    /// Returns the publication timestamp used for last-write-wins ordering.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Returns whether every availability window has ended.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.availability.iter().all(|window| window.has_ended(now))
    }
}
