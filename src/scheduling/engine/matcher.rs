//! Greedy single-pass matching.

use super::candidate::{Candidate, GuideLoad, evaluate};
use super::MatchPolicy;
use crate::scheduling::domain::{
    Assignment, GuideOffer, Money, ProposalId, ScheduleProposal, TimeWindow, TouristRequest,
};
use crate::scheduling::registry::RegistrySnapshot;
use mockable::Clock;

/// Runs one matching pass and wraps the result in a fresh proposal.
///
/// The assignment list is a pure function of the snapshot and policy;
/// only the proposal identifier and timestamp differ between passes over
/// identical input.
#[must_use]
pub fn compute_proposal(
    snapshot: &RegistrySnapshot,
    policy: &MatchPolicy,
    clock: &impl Clock,
) -> ScheduleProposal {
    ScheduleProposal::new(
        ProposalId::new(),
        compute_assignments(snapshot, policy),
        clock.utc(),
    )
}

/// Computes the assignments for one greedy pass.
///
/// Deterministic: tourists are visited in ascending id order, availability
/// windows chronologically, and candidate ranking breaks every tie. The
/// engine holds no state between passes; every registry change triggers a
/// full recomputation from a fresh snapshot.
#[must_use]
pub fn compute_assignments(snapshot: &RegistrySnapshot, policy: &MatchPolicy) -> Vec<Assignment> {
    let mut assignments = Vec::new();
    let mut guide_load = GuideLoad::new();
    for request in snapshot.requests() {
        schedule_tourist(
            request,
            snapshot.offers(),
            policy,
            &mut guide_load,
            &mut assignments,
        );
    }
    assignments
}

/// Books the best surviving candidate for each of one tourist's windows.
///
/// The tourist's budget is consumed across bookings within the pass, and a
/// booked slot blocks any later availability window overlapping it.
fn schedule_tourist(
    request: &TouristRequest,
    offers: &[GuideOffer],
    policy: &MatchPolicy,
    guide_load: &mut GuideLoad,
    assignments: &mut Vec<Assignment>,
) {
    let mut remaining_budget = request.budget();
    let mut booked_slots: Vec<TimeWindow> = Vec::new();
    let mut windows = request.availability().to_vec();
    windows.sort();

    for window in &windows {
        if booked_slots.iter().any(|slot| slot.overlaps(window)) {
            continue;
        }
        let Some(chosen) = best_candidate(request, window, offers, remaining_budget, guide_load, policy)
        else {
            continue;
        };
        remaining_budget = remaining_budget
            .checked_sub(chosen.cost)
            .unwrap_or(Money::ZERO);
        guide_load
            .entry(chosen.offer.guide_id().clone())
            .or_default()
            .push(chosen.slot);
        booked_slots.push(chosen.slot);
        assignments.push(Assignment::new(
            request.tourist_id().clone(),
            chosen.offer.guide_id().clone(),
            chosen.activity_ref.clone(),
            chosen.slot,
            chosen.cost,
        ));
    }
}

/// Picks the highest-ranked surviving candidate for one window.
fn best_candidate<'a>(
    request: &TouristRequest,
    window: &TimeWindow,
    offers: &'a [GuideOffer],
    remaining_budget: Money,
    guide_load: &GuideLoad,
    policy: &MatchPolicy,
) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;
    for offer in offers {
        let Some(candidate) = evaluate(request, window, offer, remaining_budget, guide_load, policy)
        else {
            continue;
        };
        best = match best {
            Some(current) if !candidate.beats(&current) => Some(current),
            _ => Some(candidate),
        };
    }
    best
}
