//! Candidate evaluation for one tourist availability window.

use crate::scheduling::domain::{
    ActivityRef, GuideId, GuideOffer, Money, PreferenceScore, TimeWindow, TouristRequest,
};
use super::MatchPolicy;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A guide offer that survived every filter for one availability window.
#[derive(Debug, Clone)]
pub(super) struct Candidate<'a> {
    pub(super) offer: &'a GuideOffer,
    pub(super) slot: TimeWindow,
    pub(super) cost: Money,
    pub(super) activity_ref: ActivityRef,
    score: PreferenceScore,
}

impl Candidate<'_> {
    /// Returns whether this candidate outranks `other`.
    ///
    /// Highest preference score wins; ties break to the lowest hourly rate,
    /// then the lexicographically smallest guide id, for full determinism.
    pub(super) fn beats(&self, other: &Self) -> bool {
        match self.score.cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self
                .offer
                .hourly_rate()
                .cmp(&other.offer.hourly_rate())
            {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => self.offer.guide_id() < other.offer.guide_id(),
            },
        }
    }
}

/// Slots already booked per guide within the current pass.
pub(super) type GuideLoad = HashMap<GuideId, Vec<TimeWindow>>;

/// Evaluates one offer against one availability window.
///
/// Returns `None` when any filter discards the offer: insufficient overlap,
/// projected cost above the remaining budget, or the guide's concurrent
/// load at the slot already at capacity.
pub(super) fn evaluate<'a>(
    request: &TouristRequest,
    window: &TimeWindow,
    offer: &'a GuideOffer,
    remaining_budget: Money,
    guide_load: &GuideLoad,
    policy: &MatchPolicy,
) -> Option<Candidate<'a>> {
    let overlap = window.overlap(offer.available_window())?;
    if overlap.duration_minutes() < policy.min_activity_minutes() {
        return None;
    }
    let slot = overlap.leading_slice(policy.min_activity_minutes())?;
    let cost = offer
        .hourly_rate()
        .cost_for_minutes(policy.min_activity_minutes())
        .ok()?;
    if cost > remaining_budget {
        return None;
    }
    if concurrent_load(guide_load, offer, &slot) >= capacity(offer) {
        return None;
    }
    let score = PreferenceScore::compute(request.preferences(), offer.categories());
    let activity_ref = activity_ref_for(request, offer)?;
    Some(Candidate {
        offer,
        slot,
        cost,
        activity_ref,
        score,
    })
}

/// Counts the guide's already-booked slots overlapping the candidate slot.
fn concurrent_load(guide_load: &GuideLoad, offer: &GuideOffer, slot: &TimeWindow) -> usize {
    guide_load.get(offer.guide_id()).map_or(0, |slots| {
        slots.iter().filter(|booked| booked.overlaps(slot)).count()
    })
}

/// Returns the guide capacity as an addressable count.
fn capacity(offer: &GuideOffer) -> usize {
    usize::try_from(offer.max_group_size()).unwrap_or(usize::MAX)
}

/// Derives the activity reference for a pairing.
///
/// Named after the first preference tag the guide covers, falling back to
/// the guide's first category, then to a plain sightseeing label.
fn activity_ref_for(request: &TouristRequest, offer: &GuideOffer) -> Option<ActivityRef> {
    let label = request
        .preferences()
        .intersection(offer.categories())
        .next()
        .or_else(|| offer.categories().iter().next())
        .map_or_else(|| "sightseeing".to_owned(), |tag| format!("{tag}-tour"));
    ActivityRef::new(label).ok()
}
