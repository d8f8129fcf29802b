//! Assignments pairing one tourist with one guide for a booked slot.

use super::{ActivityRef, GuideId, Money, ProposalId, TimeWindow, TouristId};
use serde::{Deserialize, Serialize};

/// One tourist/guide pairing produced by a matching pass.
///
/// Read-only once emitted inside a [`ScheduleProposal`]; retired when a
/// later proposal supersedes it.
///
/// [`ScheduleProposal`]: super::ScheduleProposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    tourist_id: TouristId,
    guide_id: GuideId,
    activity_ref: ActivityRef,
    time_window: TimeWindow,
    total_cost: Money,
}

impl Assignment {
    /// Creates an assignment record.
    #[must_use]
    pub const fn new(
        tourist_id: TouristId,
        guide_id: GuideId,
        activity_ref: ActivityRef,
        time_window: TimeWindow,
        total_cost: Money,
    ) -> Self {
        Self {
            tourist_id,
            guide_id,
            activity_ref,
            time_window,
            total_cost,
        }
    }

    /// Returns the assigned tourist.
    #[must_use]
    pub const fn tourist_id(&self) -> &TouristId {
        &self.tourist_id
    }

    /// Returns the assigned guide.
    #[must_use]
    pub const fn guide_id(&self) -> &GuideId {
        &self.guide_id
    }

    /// Returns the booked activity reference.
    #[must_use]
    pub const fn activity_ref(&self) -> &ActivityRef {
        &self.activity_ref
    }

    /// Returns the booked slot.
    #[must_use]
    pub const fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Returns the total cost of the booked slot.
    #[must_use]
    pub const fn total_cost(&self) -> Money {
        self.total_cost
    }
}

/// An accept/reject acknowledgement for one proposed assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentAck {
    /// Proposal the acknowledged assignment belongs to.
    pub proposal_id: ProposalId,
    /// Tourist party of the assignment.
    pub tourist_id: TouristId,
    /// Guide party of the assignment.
    pub guide_id: GuideId,
    /// Whether the assignment was accepted by the acknowledging party.
    pub accepted: bool,
}
