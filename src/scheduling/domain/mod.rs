//! Domain types for the scheduling subsystem.
//!
//! Pure value objects and aggregates with no infrastructure dependencies.
//! All types are immutable after construction and serialisable via serde.

mod assignment;
mod error;
mod ids;
mod money;
mod offer;
mod proposal;
mod request;
mod score;
mod tag;
mod time_window;

pub use assignment::{Assignment, AssignmentAck};
pub use error::SchedulingDomainError;
pub use ids::{ActivityRef, GuideId, ProposalId, TouristId};
pub use money::Money;
pub use offer::GuideOffer;
pub use proposal::ScheduleProposal;
pub use request::TouristRequest;
pub use score::PreferenceScore;
pub use tag::Tag;
pub use time_window::TimeWindow;
