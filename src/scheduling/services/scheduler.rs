//! Scheduler service: registry mutation, recomputation, and negotiation.

use crate::bus::message::{Envelope, Topic, WireMessage};
use crate::bus::ports::{BusError, BusResult, MessageBus, MessageHandler, Subscription};
use crate::notification::{BusNotificationSink, CoreEvent, NotificationSink};
use crate::scheduling::domain::{
    Assignment, AssignmentAck, GuideId, GuideOffer, ProposalId, ScheduleProposal, TouristId,
    TouristRequest,
};
use crate::scheduling::engine::{compute_proposal, MatchPolicy};
use crate::scheduling::registry::{AgentRegistry, RegistryError, UpsertOutcome};
use crate::task::domain::{ContextId, Role, TaskId, TaskState};
use crate::task::ports::TaskRepository;
use crate::task::services::{TaskLifecycleError, TaskLifecycleService};
use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors raised while handling scheduling traffic.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Registry access failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Bus publication failed locally.
    #[error(transparent)]
    Bus(#[from] BusError),
    /// A negotiation task operation failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// The negotiation table lock was poisoned.
    #[error("negotiation table lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Negotiation tasks open for the assignments of the current proposal.
#[derive(Debug, Default)]
struct NegotiationTable {
    proposal_id: Option<ProposalId>,
    tasks: HashMap<(TouristId, GuideId), TaskId>,
}

/// Orchestrates the registry, matching engine, negotiation tasks, and bus.
///
/// Every registry mutation and the explicit late-arrival signal trigger a
/// full recomputation from a fresh snapshot; the resulting proposal is
/// published on `schedule.proposal` and one negotiation task is opened per
/// assignment.
pub struct SchedulerService<B, R, C>
where
    B: MessageBus,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    bus: Arc<B>,
    registry: AgentRegistry,
    policy: MatchPolicy,
    lifecycle: TaskLifecycleService<R, C>,
    sink: BusNotificationSink<B, C>,
    clock: Arc<C>,
    negotiations: RwLock<NegotiationTable>,
}

impl<B, R, C> SchedulerService<B, R, C>
where
    B: MessageBus,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler over a bus, registry, and task repository.
    #[must_use]
    pub fn new(
        bus: Arc<B>,
        registry: AgentRegistry,
        policy: MatchPolicy,
        lifecycle: TaskLifecycleService<R, C>,
        clock: Arc<C>,
    ) -> Self {
        let sink = BusNotificationSink::new(Arc::clone(&bus), Arc::clone(&clock));
        Self {
            bus,
            registry,
            policy,
            lifecycle,
            sink,
            clock,
            negotiations: RwLock::new(NegotiationTable::default()),
        }
    }

    /// Registers the scheduler as a subscriber on its bus.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Bus`] when a subscription cannot be taken.
    pub async fn attach(self: Arc<Self>) -> SchedulerResult<Vec<Subscription>>
    where
        B: 'static,
        R: 'static,
        C: 'static,
    {
        let handler: Arc<dyn MessageHandler> = Arc::new(SchedulerSubscriber {
            scheduler: Arc::clone(&self),
        });
        let mut subscriptions = Vec::new();
        for topic in [Topic::TouristRequest, Topic::GuideOffer, Topic::ScheduleProposal] {
            subscriptions.push(self.bus.subscribe(topic, Arc::clone(&handler)).await?);
        }
        Ok(subscriptions)
    }

    /// Handles an inbound tourist request.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when registry access, recomputation, or
    /// publication fails.
    pub async fn handle_request(
        &self,
        request: TouristRequest,
    ) -> SchedulerResult<Option<ScheduleProposal>> {
        let tourist_id = request.tourist_id().clone();
        match self.registry.upsert_request(request)? {
            UpsertOutcome::DiscardedStale => {
                debug!(%tourist_id, "stale tourist request discarded");
                Ok(None)
            }
            UpsertOutcome::Applied => {
                info!(%tourist_id, "tourist request upserted; rescheduling");
                self.recompute_and_publish().await.map(Some)
            }
        }
    }

    /// Handles an inbound guide offer.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when registry access, recomputation, or
    /// publication fails.
    pub async fn handle_offer(
        &self,
        offer: GuideOffer,
    ) -> SchedulerResult<Option<ScheduleProposal>> {
        let guide_id = offer.guide_id().clone();
        match self.registry.upsert_offer(offer)? {
            UpsertOutcome::DiscardedStale => {
                debug!(%guide_id, "stale guide offer discarded");
                Ok(None)
            }
            UpsertOutcome::Applied => {
                info!(%guide_id, "guide offer upserted; rescheduling");
                self.recompute_and_publish().await.map(Some)
            }
        }
    }

    /// Handles withdrawal of a tourist's request.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when registry access, recomputation, or
    /// publication fails.
    pub async fn handle_tourist_cancellation(
        &self,
        tourist_id: &TouristId,
    ) -> SchedulerResult<Option<ScheduleProposal>> {
        if !self.registry.cancel_request(tourist_id)? {
            debug!(%tourist_id, "cancellation for unknown tourist ignored");
            return Ok(None);
        }
        info!(%tourist_id, "tourist request cancelled; rescheduling");
        self.recompute_and_publish().await.map(Some)
    }

    /// Handles withdrawal of a guide's offer.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when registry access, recomputation, or
    /// publication fails.
    pub async fn handle_guide_cancellation(
        &self,
        guide_id: &GuideId,
    ) -> SchedulerResult<Option<ScheduleProposal>> {
        if !self.registry.cancel_offer(guide_id)? {
            debug!(%guide_id, "cancellation for unknown guide ignored");
            return Ok(None);
        }
        info!(%guide_id, "guide offer cancelled; rescheduling");
        self.recompute_and_publish().await.map(Some)
    }

    /// Handles an explicit late-arrival re-scheduling trigger.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when recomputation or publication fails.
    pub async fn handle_late_arrival(
        &self,
        tourist_id: &TouristId,
    ) -> SchedulerResult<ScheduleProposal> {
        info!(%tourist_id, "late arrival signalled; rescheduling");
        self.recompute_and_publish().await
    }

    /// Handles an accept/reject acknowledgement for a proposed assignment.
    ///
    /// Acceptance completes the negotiation task; a decline rejects it
    /// before work starts and cancels it afterwards. Acks addressed to a
    /// superseded proposal are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when the task transition or notification
    /// fails.
    pub async fn handle_assignment_ack(&self, ack: &AssignmentAck) -> SchedulerResult<()> {
        let task_id = {
            let table = self
                .negotiations
                .read()
                .map_err(|err| SchedulerError::LockPoisoned(err.to_string()))?;
            if table.proposal_id != Some(ack.proposal_id) {
                warn!(proposal_id = %ack.proposal_id, "ack for superseded proposal ignored");
                return Ok(());
            }
            table
                .tasks
                .get(&(ack.tourist_id.clone(), ack.guide_id.clone()))
                .copied()
        };
        let Some(task_id) = task_id else {
            warn!(
                tourist_id = %ack.tourist_id,
                guide_id = %ack.guide_id,
                "ack for unknown assignment ignored"
            );
            return Ok(());
        };

        let before = self.lifecycle.get(task_id).await?.state();
        let task = if ack.accepted {
            if before == TaskState::Submitted {
                self.lifecycle.begin_work(task_id).await?;
            }
            self.lifecycle.complete(task_id, None).await?
        } else if before == TaskState::Submitted {
            self.lifecycle.reject(task_id).await?
        } else {
            self.lifecycle.cancel(task_id).await?
        };
        self.sink
            .notify(CoreEvent::TaskStateChanged {
                task_id,
                context_id: task.context_id(),
                from: before,
                to: task.state(),
            })
            .await?;
        Ok(())
    }

    /// Prunes, recomputes, opens negotiations, and publishes the proposal.
    async fn recompute_and_publish(&self) -> SchedulerResult<ScheduleProposal> {
        let pruned = self.registry.remove_expired(self.clock.utc())?;
        if !pruned.is_empty() {
            self.sink
                .notify(CoreEvent::RegistryPruned {
                    requests_removed: pruned.requests_removed,
                    offers_removed: pruned.offers_removed,
                })
                .await?;
        }
        let snapshot = self.registry.snapshot()?;
        let proposal = compute_proposal(&snapshot, &self.policy, &*self.clock);
        self.open_negotiations(&proposal).await?;
        let envelope = Envelope::new(
            WireMessage::ScheduleProposal(proposal.clone()),
            &*self.clock,
        );
        self.bus.publish(Topic::ScheduleProposal, envelope).await?;
        self.sink
            .notify(CoreEvent::ProposalComputed {
                proposal_id: proposal.proposal_id(),
                assignment_count: proposal.assignments().len(),
            })
            .await?;
        Ok(proposal)
    }

    /// Cancels negotiations superseded by a new proposal and opens fresh ones.
    async fn open_negotiations(&self, proposal: &ScheduleProposal) -> SchedulerResult<()> {
        let superseded: Vec<TaskId> = {
            let table = self
                .negotiations
                .read()
                .map_err(|err| SchedulerError::LockPoisoned(err.to_string()))?;
            table.tasks.values().copied().collect()
        };
        for task_id in superseded {
            match self.lifecycle.cancel(task_id).await {
                Ok(_) => debug!(%task_id, "superseded negotiation cancelled"),
                // Already concluded negotiations stay as they ended.
                Err(TaskLifecycleError::Domain(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        let mut tasks = HashMap::new();
        for assignment in proposal.assignments() {
            let task = self
                .lifecycle
                .submit(ContextId::new(), Role::Agent, negotiation_note(assignment))
                .await?;
            tasks.insert(
                (
                    assignment.tourist_id().clone(),
                    assignment.guide_id().clone(),
                ),
                task.task_id(),
            );
        }

        let mut table = self
            .negotiations
            .write()
            .map_err(|err| SchedulerError::LockPoisoned(err.to_string()))?;
        table.proposal_id = Some(proposal.proposal_id());
        table.tasks = tasks;
        Ok(())
    }
}

/// Opening message for one negotiation task.
fn negotiation_note(assignment: &Assignment) -> String {
    format!(
        "proposed {} with guide {} for tourist {} at {}",
        assignment.activity_ref(),
        assignment.guide_id(),
        assignment.tourist_id(),
        assignment.time_window().start()
    )
}

/// Bus-facing adapter delivering envelopes to the scheduler.
struct SchedulerSubscriber<B, R, C>
where
    B: MessageBus,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    scheduler: Arc<SchedulerService<B, R, C>>,
}

#[async_trait]
impl<B, R, C> MessageHandler for SchedulerSubscriber<B, R, C>
where
    B: MessageBus + 'static,
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn handle(&self, envelope: &Envelope) -> BusResult<()> {
        let outcome = match envelope.payload() {
            WireMessage::TouristRequest(request) => self
                .scheduler
                .handle_request(request.clone())
                .await
                .map(|_| ()),
            WireMessage::GuideOffer(offer) => {
                self.scheduler.handle_offer(offer.clone()).await.map(|_| ())
            }
            WireMessage::TouristCancellation { tourist_id } => self
                .scheduler
                .handle_tourist_cancellation(tourist_id)
                .await
                .map(|_| ()),
            WireMessage::GuideCancellation { guide_id } => self
                .scheduler
                .handle_guide_cancellation(guide_id)
                .await
                .map(|_| ()),
            WireMessage::LateArrival { tourist_id } => self
                .scheduler
                .handle_late_arrival(tourist_id)
                .await
                .map(|_| ()),
            WireMessage::AssignmentAck(ack) => self.scheduler.handle_assignment_ack(ack).await,
            // The scheduler's own outputs circulate on the same bus.
            WireMessage::ScheduleProposal(_) | WireMessage::TaskStatus { .. } => Ok(()),
        };
        outcome.map_err(|err| BusError::Handler(err.to_string()))
    }
}
