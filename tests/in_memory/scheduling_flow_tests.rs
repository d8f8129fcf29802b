//! Bus-driven scheduling integration tests.

use std::sync::Arc;

use super::helpers::{guide, reference_instant, tourist, window, FixedClock, Recorder};
use chrono::Duration;
use cicerone::bus::adapters::InProcessBus;
use cicerone::bus::message::{Envelope, Topic, WireMessage};
use cicerone::bus::ports::MessageBus;
use cicerone::notification::CoreEvent;
use cicerone::scheduling::domain::{AssignmentAck, GuideId, ScheduleProposal};
use cicerone::scheduling::engine::MatchPolicy;
use cicerone::scheduling::registry::AgentRegistry;
use cicerone::scheduling::services::SchedulerService;
use cicerone::task::adapters::memory::InMemoryTaskRepository;
use cicerone::task::domain::TaskState;
use cicerone::task::services::TaskLifecycleService;
use eyre::ensure;
use rstest::rstest;

struct Harness {
    bus: Arc<InProcessBus>,
    proposals: Arc<Recorder>,
    events: Arc<Recorder>,
    clock: Arc<FixedClock>,
}

async fn attach_scheduler() -> eyre::Result<Harness> {
    let bus = Arc::new(InProcessBus::new());
    let proposals = Arc::new(Recorder::default());
    let events = Arc::new(Recorder::default());
    bus.subscribe(Topic::ScheduleProposal, Arc::clone(&proposals) as _)
        .await?;
    bus.subscribe(Topic::TaskState, Arc::clone(&events) as _)
        .await?;

    let clock = Arc::new(FixedClock(reference_instant()));
    let lifecycle = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&clock),
    );
    let scheduler = Arc::new(SchedulerService::new(
        Arc::clone(&bus),
        AgentRegistry::new(Duration::minutes(5)),
        MatchPolicy::default(),
        lifecycle,
        Arc::clone(&clock),
    ));
    scheduler.attach().await?;
    Ok(Harness {
        bus,
        proposals,
        events,
        clock,
    })
}

impl Harness {
    async fn publish(&self, topic: Topic, payload: WireMessage) -> eyre::Result<()> {
        self.bus
            .publish(topic, Envelope::new(payload, &*self.clock))
            .await?;
        Ok(())
    }

    fn latest_proposal(&self) -> Option<ScheduleProposal> {
        self.proposals
            .payloads()
            .into_iter()
            .rev()
            .find_map(|payload| match payload {
                WireMessage::ScheduleProposal(proposal) => Some(proposal),
                _ => None,
            })
    }

    fn state_changes(&self) -> Vec<(TaskState, TaskState)> {
        self.events
            .payloads()
            .into_iter()
            .filter_map(|payload| match payload {
                WireMessage::TaskStatus {
                    event: CoreEvent::TaskStateChanged { from, to, .. },
                } => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn published_request_and_offer_yield_a_proposal() -> eyre::Result<()> {
    let harness = attach_scheduler().await?;

    harness
        .publish(
            Topic::TouristRequest,
            WireMessage::TouristRequest(tourist("t1", vec![window(9, 13)], 10_000, &["history"])),
        )
        .await?;
    harness
        .publish(
            Topic::GuideOffer,
            WireMessage::GuideOffer(guide("g1", &["history"], window(10, 14), 6000, 4)),
        )
        .await?;

    let proposal = harness
        .latest_proposal()
        .ok_or_else(|| eyre::eyre!("proposal published"))?;
    ensure!(proposal.assignments().len() == 1);
    let assignment = proposal
        .assignments()
        .first()
        .ok_or_else(|| eyre::eyre!("one assignment"))?;
    ensure!(assignment.time_window() == &window(10, 11));
    ensure!(assignment.total_cost().cents() == 6000);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guide_cancellation_retracts_assignments() -> eyre::Result<()> {
    let harness = attach_scheduler().await?;
    harness
        .publish(
            Topic::TouristRequest,
            WireMessage::TouristRequest(tourist("t1", vec![window(9, 13)], 10_000, &["history"])),
        )
        .await?;
    harness
        .publish(
            Topic::GuideOffer,
            WireMessage::GuideOffer(guide("g1", &["history"], window(9, 13), 6000, 4)),
        )
        .await?;

    harness
        .publish(
            Topic::GuideOffer,
            WireMessage::GuideCancellation {
                guide_id: GuideId::new("g1")?,
            },
        )
        .await?;

    let proposal = harness
        .latest_proposal()
        .ok_or_else(|| eyre::eyre!("proposal published"))?;
    ensure!(proposal.assignments().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_ack_completes_the_negotiation_over_the_bus() -> eyre::Result<()> {
    let harness = attach_scheduler().await?;
    harness
        .publish(
            Topic::TouristRequest,
            WireMessage::TouristRequest(tourist("t1", vec![window(9, 13)], 10_000, &["history"])),
        )
        .await?;
    harness
        .publish(
            Topic::GuideOffer,
            WireMessage::GuideOffer(guide("g1", &["history"], window(9, 13), 6000, 4)),
        )
        .await?;
    let proposal = harness
        .latest_proposal()
        .ok_or_else(|| eyre::eyre!("proposal published"))?;
    let assignment = proposal
        .assignments()
        .first()
        .ok_or_else(|| eyre::eyre!("one assignment"))?;

    harness
        .publish(
            Topic::ScheduleProposal,
            WireMessage::AssignmentAck(AssignmentAck {
                proposal_id: proposal.proposal_id(),
                tourist_id: assignment.tourist_id().clone(),
                guide_id: assignment.guide_id().clone(),
                accepted: true,
            }),
        )
        .await?;

    ensure!(
        harness.state_changes() == vec![(TaskState::Submitted, TaskState::Completed)]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_arrival_triggers_a_fresh_proposal() -> eyre::Result<()> {
    let harness = attach_scheduler().await?;
    harness
        .publish(
            Topic::TouristRequest,
            WireMessage::TouristRequest(tourist("t1", vec![window(9, 13)], 10_000, &[])),
        )
        .await?;
    let before = harness.proposals.payloads().len();

    harness
        .publish(
            Topic::TouristRequest,
            WireMessage::LateArrival {
                tourist_id: cicerone::scheduling::domain::TouristId::new("t1")?,
            },
        )
        .await?;

    ensure!(harness.proposals.payloads().len() == before + 1);
    Ok(())
}
