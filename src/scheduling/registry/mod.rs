//! Agent registry: the one mutable shared resource in the core.
//!
//! Tracks the latest tourist request per tourist and guide offer per guide.
//! All mutation goes through the upsert/cancel/prune operations; readers take
//! an immutable copy-on-read snapshot, so the matching engine never iterates
//! under the lock while publishers keep upserting.

mod snapshot;

pub use snapshot::RegistrySnapshot;

use crate::scheduling::domain::{GuideId, GuideOffer, TouristId, TouristRequest};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors returned by the agent registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The interior lock was poisoned by a panicking writer.
    #[error("registry lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Outcome of an upsert, distinguishing applied writes from stale discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The record replaced (or created) the stored entry.
    Applied,
    /// The record lagged the stored entry beyond the staleness window and
    /// was discarded.
    DiscardedStale,
}

impl UpsertOutcome {
    /// Returns whether the write was applied.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Counts of entries removed by an expiry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrunedCounts {
    /// Tourist requests removed.
    pub requests_removed: usize,
    /// Guide offers removed.
    pub offers_removed: usize,
}

impl PrunedCounts {
    /// Returns whether anything was pruned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.requests_removed == 0 && self.offers_removed == 0
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    requests: HashMap<TouristId, TouristRequest>,
    offers: HashMap<GuideId, GuideOffer>,
}

/// Thread-safe registry of currently known requests and offers.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    state: Arc<RwLock<RegistryState>>,
    staleness_window: Duration,
}

impl AgentRegistry {
    /// Creates an empty registry with the given staleness window.
    ///
    /// An incoming record whose publication timestamp lags the stored
    /// record's by more than the window is discarded as stale; within the
    /// window, the last upsert delivered wins.
    #[must_use]
    pub fn new(staleness_window: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
            staleness_window,
        }
    }

    /// Inserts or replaces the request stored for a tourist.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the interior lock is
    /// poisoned.
    pub fn upsert_request(&self, request: TouristRequest) -> RegistryResult<UpsertOutcome> {
        let mut state = self.write()?;
        let stale = state.requests.get(request.tourist_id()).is_some_and(|existing| {
            is_stale(
                request.published_at(),
                existing.published_at(),
                self.staleness_window,
            )
        });
        if stale {
            return Ok(UpsertOutcome::DiscardedStale);
        }
        state
            .requests
            .insert(request.tourist_id().clone(), request);
        Ok(UpsertOutcome::Applied)
    }

    /// Inserts or replaces the offer stored for a guide.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the interior lock is
    /// poisoned.
    pub fn upsert_offer(&self, offer: GuideOffer) -> RegistryResult<UpsertOutcome> {
        let mut state = self.write()?;
        let stale = state.offers.get(offer.guide_id()).is_some_and(|existing| {
            is_stale(
                offer.published_at(),
                existing.published_at(),
                self.staleness_window,
            )
        });
        if stale {
            return Ok(UpsertOutcome::DiscardedStale);
        }
        state.offers.insert(offer.guide_id().clone(), offer);
        Ok(UpsertOutcome::Applied)
    }

    /// Removes the request stored for a tourist, returning whether one
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the interior lock is
    /// poisoned.
    pub fn cancel_request(&self, tourist_id: &TouristId) -> RegistryResult<bool> {
        let mut state = self.write()?;
        Ok(state.requests.remove(tourist_id).is_some())
    }

    /// Removes the offer stored for a guide, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the interior lock is
    /// poisoned.
    pub fn cancel_offer(&self, guide_id: &GuideId) -> RegistryResult<bool> {
        let mut state = self.write()?;
        Ok(state.offers.remove(guide_id).is_some())
    }

    /// Prunes requests and offers whose windows have all ended.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the interior lock is
    /// poisoned.
    pub fn remove_expired(&self, now: DateTime<Utc>) -> RegistryResult<PrunedCounts> {
        let mut state = self.write()?;
        let requests_before = state.requests.len();
        let offers_before = state.offers.len();
        state.requests.retain(|_, request| !request.is_expired(now));
        state.offers.retain(|_, offer| !offer.is_expired(now));
        Ok(PrunedCounts {
            requests_removed: requests_before - state.requests.len(),
            offers_removed: offers_before - state.offers.len(),
        })
    }

    /// Takes an immutable copy-on-read snapshot, sorted for determinism.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the interior lock is
    /// poisoned.
    pub fn snapshot(&self) -> RegistryResult<RegistrySnapshot> {
        let state = self
            .state
            .read()
            .map_err(|err| RegistryError::LockPoisoned(err.to_string()))?;
        Ok(RegistrySnapshot::from_entries(
            state.requests.values().cloned(),
            state.offers.values().cloned(),
        ))
    }

    fn write(&self) -> RegistryResult<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|err| RegistryError::LockPoisoned(err.to_string()))
    }
}

/// Returns whether an incoming timestamp lags the stored one beyond the
/// staleness window.
fn is_stale(incoming: DateTime<Utc>, stored: DateTime<Utc>, window: Duration) -> bool {
    stored - incoming > window
}
