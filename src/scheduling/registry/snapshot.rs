//! Immutable registry snapshots consumed by the matching engine.

use crate::scheduling::domain::{GuideOffer, TouristRequest};

/// An immutable copy of the registry taken at one instant.
///
/// Entries are sorted by identifier so every consumer iterates in the same
/// order, which the matching engine relies on for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrySnapshot {
    requests: Vec<TouristRequest>,
    offers: Vec<GuideOffer>,
}

impl RegistrySnapshot {
    /// Builds a snapshot from arbitrary-order entries, sorting them.
    #[must_use]
    pub fn from_entries(
        requests: impl IntoIterator<Item = TouristRequest>,
        offers: impl IntoIterator<Item = GuideOffer>,
    ) -> Self {
        let mut sorted_requests: Vec<TouristRequest> = requests.into_iter().collect();
        sorted_requests.sort_by(|a, b| a.tourist_id().cmp(b.tourist_id()));
        let mut sorted_offers: Vec<GuideOffer> = offers.into_iter().collect();
        sorted_offers.sort_by(|a, b| a.guide_id().cmp(b.guide_id()));
        Self {
            requests: sorted_requests,
            offers: sorted_offers,
        }
    }

    /// Returns the requests in ascending tourist-id order.
    #[must_use]
    pub fn requests(&self) -> &[TouristRequest] {
        &self.requests
    }

    /// Returns the offers in ascending guide-id order.
    #[must_use]
    pub fn offers(&self) -> &[GuideOffer] {
        &self.offers
    }

    /// Returns whether the snapshot holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.offers.is_empty()
    }
}
