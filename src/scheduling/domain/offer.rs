//! Guide offer aggregate.

use super::{GuideId, Money, SchedulingDomainError, Tag, TimeWindow};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A guide's published availability offer.
///
/// Immutable once published; a newer offer with the same `guide_id`
/// supersedes it (last-write-wins in the registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideOffer {
    guide_id: GuideId,
    categories: BTreeSet<Tag>,
    available_window: TimeWindow,
    hourly_rate: Money,
    max_group_size: u32,
    published_at: DateTime<Utc>,
}

impl GuideOffer {
    /// Creates an offer stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::ZeroGroupCapacity`] when
    /// `max_group_size` is zero.
    pub fn new(
        guide_id: GuideId,
        categories: BTreeSet<Tag>,
        available_window: TimeWindow,
        hourly_rate: Money,
        max_group_size: u32,
        clock: &impl Clock,
    ) -> Result<Self, SchedulingDomainError> {
        if max_group_size == 0 {
            return Err(SchedulingDomainError::ZeroGroupCapacity(
                guide_id.as_str().to_owned(),
            ));
        }
        Ok(Self {
            guide_id,
            categories,
            available_window,
            hourly_rate,
            max_group_size,
            published_at: clock.utc(),
        })
    }

    /// Returns the guide identifier.
    #[must_use]
    pub const fn guide_id(&self) -> &GuideId {
        &self.guide_id
    }

    /// Returns the activity categories this guide covers.
    #[must_use]
    pub const fn categories(&self) -> &BTreeSet<Tag> {
        &self.categories
    }

    /// Returns the window the guide is available in.
    #[must_use]
    pub const fn available_window(&self) -> &TimeWindow {
        &self.available_window
    }

    /// Returns the hourly rate.
    #[must_use]
    pub const fn hourly_rate(&self) -> Money {
        self.hourly_rate
    }

    /// Returns the maximum number of concurrent assignments the guide takes.
    #[must_use]
    pub const fn max_group_size(&self) -> u32 {
        self.max_group_size
    }

    /// Returns the publication timestamp used for last-write-wins ordering.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Returns whether the offered window has ended.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.available_window.has_ended(now)
    }
}
