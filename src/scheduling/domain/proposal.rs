//! Schedule proposals, the atomic output of one matching pass.

use super::{Assignment, ProposalId, TouristId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The atomic, immutable output of one matching pass.
///
/// A later proposal may add, replace, or drop assignments relative to an
/// earlier one, but each pass emits a proposal under its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleProposal {
    proposal_id: ProposalId,
    assignments: Vec<Assignment>,
    computed_at: DateTime<Utc>,
}

impl ScheduleProposal {
    /// Creates a proposal from one matching pass.
    #[must_use]
    pub const fn new(
        proposal_id: ProposalId,
        assignments: Vec<Assignment>,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            proposal_id,
            assignments,
            computed_at,
        }
    }

    /// Returns the proposal identifier.
    #[must_use]
    pub const fn proposal_id(&self) -> ProposalId {
        self.proposal_id
    }

    /// Returns the assignments in tourist-id order.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns when the pass ran.
    #[must_use]
    pub const fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    /// Returns the assignments booked for one tourist.
    #[must_use]
    pub fn assignments_for(&self, tourist_id: &TouristId) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.tourist_id() == tourist_id)
            .collect()
    }
}
