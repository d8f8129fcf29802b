//! Typed topics and the wire message envelope.

use crate::notification::CoreEvent;
use crate::scheduling::domain::{
    AssignmentAck, GuideId, GuideOffer, ScheduleProposal, TouristId, TouristRequest,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error raised when parsing a topic from its string form fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised topic: {0}")]
pub struct ParseTopicError(pub String);

/// The topics messages are published under, typed by message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Tourist requests and cancellations.
    TouristRequest,
    /// Guide offers and cancellations.
    GuideOffer,
    /// Proposals emitted by the matching engine, and their acks.
    ScheduleProposal,
    /// Task state notifications for external sinks.
    TaskState,
}

impl Topic {
    /// Returns the canonical dotted topic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TouristRequest => "tourist.request",
            Self::GuideOffer => "guide.offer",
            Self::ScheduleProposal => "schedule.proposal",
            Self::TaskState => "task.state",
        }
    }
}

impl TryFrom<&str> for Topic {
    type Error = ParseTopicError;

    fn try_from(value: &str) -> Result<Self, ParseTopicError> {
        match value.trim() {
            "tourist.request" => Ok(Self::TouristRequest),
            "guide.offer" => Ok(Self::GuideOffer),
            "schedule.proposal" => Ok(Self::ScheduleProposal),
            "task.state" => Ok(Self::TaskState),
            other => Err(ParseTopicError(other.to_owned())),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discriminated union of every message the core exchanges.
///
/// Wire-serialized as JSON with an explicit `"type"` discriminator field and
/// stable field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireMessage {
    /// A tourist's scheduling request.
    TouristRequest(TouristRequest),
    /// A guide's availability offer.
    GuideOffer(GuideOffer),
    /// One atomic matching pass output.
    ScheduleProposal(ScheduleProposal),
    /// Withdrawal of a tourist's request.
    TouristCancellation {
        /// Tourist withdrawing the request.
        tourist_id: TouristId,
    },
    /// Withdrawal of a guide's offer.
    GuideCancellation {
        /// Guide withdrawing the offer.
        guide_id: GuideId,
    },
    /// Explicit re-scheduling trigger for a tourist arriving late.
    LateArrival {
        /// Tourist the late arrival concerns.
        tourist_id: TouristId,
    },
    /// Accept/reject acknowledgement for one proposed assignment.
    AssignmentAck(AssignmentAck),
    /// A state or metric event for external notification sinks.
    TaskStatus {
        /// The emitted event.
        event: CoreEvent,
    },
}

impl WireMessage {
    /// Returns the topic this message kind belongs on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::TouristRequest(_) | Self::TouristCancellation { .. } | Self::LateArrival { .. } => {
                Topic::TouristRequest
            }
            Self::GuideOffer(_) | Self::GuideCancellation { .. } => Topic::GuideOffer,
            Self::ScheduleProposal(_) | Self::AssignmentAck(_) => Topic::ScheduleProposal,
            Self::TaskStatus { .. } => Topic::TaskState,
        }
    }
}

/// Delivery envelope wrapping one wire message.
///
/// The envelope identifier makes retried deliveries idempotent: a consumer
/// that has seen the identifier may drop the duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    message_id: Uuid,
    published_at: DateTime<Utc>,
    payload: WireMessage,
}

impl Envelope {
    /// Wraps a payload, stamping it with the current clock time.
    #[must_use]
    pub fn new(payload: WireMessage, clock: &impl Clock) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            published_at: clock.utc(),
            payload,
        }
    }

    /// Returns the envelope identifier used for idempotent retry.
    #[must_use]
    pub const fn message_id(&self) -> Uuid {
        self.message_id
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Returns the wrapped payload.
    #[must_use]
    pub const fn payload(&self) -> &WireMessage {
        &self.payload
    }

    /// Consumes the envelope, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> WireMessage {
        self.payload
    }
}
