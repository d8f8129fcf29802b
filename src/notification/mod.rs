//! Outbound notification events and the sink that carries them.
//!
//! The core reports observable state changes as [`CoreEvent`] values through
//! a [`NotificationSink`]. The default sink publishes each event on the
//! message bus under the task-state topic, so external listeners receive the
//! same envelope format as every other message.

use crate::bus::message::{Envelope, Topic, WireMessage};
use crate::bus::ports::{BusResult, MessageBus};
use crate::scheduling::domain::ProposalId;
use crate::task::domain::{ContextId, TaskId, TaskState};
use async_trait::async_trait;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;


/// An observable state change emitted by the core.
///
/// Wire-serialized with an explicit `"event"` discriminator field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoreEvent {
    /// A task moved between lifecycle states.
    TaskStateChanged {
        /// The task that changed.
        task_id: TaskId,
        /// The conversation the task belongs to.
        context_id: ContextId,
        /// State before the transition.
        from: TaskState,
        /// State after the transition.
        to: TaskState,
    },
    /// The matching engine produced a proposal.
    ProposalComputed {
        /// Identifier of the computed proposal.
        proposal_id: ProposalId,
        /// Number of assignments in the proposal.
        assignment_count: usize,
    },
    /// The registry dropped expired entries.
    RegistryPruned {
        /// Requests removed because every window had passed.
        requests_removed: usize,
        /// Offers removed because their window had passed.
        offers_removed: usize,
    },
    /// A transport absorbed a remote delivery failure.
    TransportDegraded {
        /// Human-readable description of the degradation.
        detail: String,
    },
}

/// Destination for [`CoreEvent`] values.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Emits one event.
    ///
    /// # Errors
    ///
    /// Returns a bus error when the sink cannot accept the event locally;
    /// remote delivery failures are absorbed by the transport.
    async fn notify(&self, event: CoreEvent) -> BusResult<()>;
}

/// Sink that publishes events on the message bus under [`Topic::TaskState`].
pub struct BusNotificationSink<B, C> {
    bus: Arc<B>,
    clock: Arc<C>,
}

impl<B, C> BusNotificationSink<B, C> {
    /// Creates a sink publishing through the given bus.
    #[must_use]
    pub const fn new(bus: Arc<B>, clock: Arc<C>) -> Self {
        Self { bus, clock }
    }
}

#[async_trait]
impl<B, C> NotificationSink for BusNotificationSink<B, C>
where
    B: MessageBus,
    C: Clock + Send + Sync,
{
    async fn notify(&self, event: CoreEvent) -> BusResult<()> {
        debug!(?event, "emitting core event");
        let envelope = Envelope::new(WireMessage::TaskStatus { event }, self.clock.as_ref());
        self.bus.publish(Topic::TaskState, envelope).await
    }
}
