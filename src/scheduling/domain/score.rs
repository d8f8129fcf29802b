//! Exact preference scores for candidate ranking.

use super::Tag;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// The fraction of a tourist's preferences a guide's categories cover.
///
/// Stored as an exact rational so ranking is bit-identical across runs; no
/// floating point is involved. An empty preference set means the tourist has
/// no preference constraint and scores every candidate at one.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceScore {
    matched: u32,
    total: u32,
}

impl PreferenceScore {
    /// The full score of one, used when no preference constraint applies.
    pub const FULL: Self = Self {
        matched: 1,
        total: 1,
    };

    /// The zero score.
    pub const ZERO: Self = Self {
        matched: 0,
        total: 1,
    };

    /// Scores a guide's categories against a tourist's preferences.
    #[must_use]
    pub fn compute(preferences: &BTreeSet<Tag>, categories: &BTreeSet<Tag>) -> Self {
        if preferences.is_empty() {
            return Self::FULL;
        }
        let matched = preferences.intersection(categories).count();
        let matched_count = u32::try_from(matched).unwrap_or(u32::MAX);
        let total_count = u32::try_from(preferences.len()).unwrap_or(u32::MAX);
        Self {
            matched: matched_count,
            total: total_count.max(1),
        }
    }

    /// Returns the cross-multiplied comparison terms against another score.
    fn cross(self, other: Self) -> (u64, u64) {
        (
            u64::from(self.matched) * u64::from(other.total),
            u64::from(other.matched) * u64::from(self.total),
        )
    }
}

impl PartialEq for PreferenceScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PreferenceScore {}

impl PartialOrd for PreferenceScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PreferenceScore {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = self.cross(*other);
        lhs.cmp(&rhs)
    }
}
