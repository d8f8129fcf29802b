//! In-memory integration tests for A2A task lifecycle operations.

use std::sync::Arc;

use cicerone::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Artifact, ContextId, Role, TaskDomainError, TaskState},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

type TestService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn negotiation_progresses_to_completion_with_artifact(
    service: TestService,
) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "book a gallery visit")
        .await?;
    let task_id = task.task_id();
    ensure!(task.state() == TaskState::Submitted);
    ensure!(task.created_at() == task.updated_at());

    service.begin_work(task_id).await?;
    service.require_input(task_id).await?;
    service
        .provide_input(task_id, Role::User, "thursday morning please")
        .await?;

    let artifact = Artifact::new(
        "assignment",
        json!({"guide_id": "g1", "activity": "gallery-tour"}),
    )?;
    let completed = service.complete(task_id, Some(artifact)).await?;

    ensure!(completed.state() == TaskState::Completed);
    ensure!(completed.artifacts().len() == 1);
    ensure!(completed.message_history().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceled_negotiation_refuses_every_follow_up(service: TestService) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "tentative request")
        .await?;
    let task_id = task.task_id();
    service.cancel(task_id).await?;

    let message = service
        .append_message(task_id, Role::Agent, "update: slot found")
        .await;
    let completion = service.complete(task_id, None).await;
    let cancellation = service.cancel(task_id).await;

    for outcome in [message, completion, cancellation] {
        ensure!(matches!(
            outcome,
            Err(TaskLifecycleError::Domain(
                TaskDomainError::CannotBeContinued { .. }
            ))
        ));
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authorization_outage_is_absorbed_within_the_bound(
    service: TestService,
) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "collaborator-gated request")
        .await?;
    let task_id = task.task_id();
    service.begin_work(task_id).await?;

    let parked = service.report_auth_failure(task_id).await?;
    ensure!(parked.state() == TaskState::AuthRequired);

    let resumed = service.resolve_auth(task_id).await?;
    ensure!(resumed.state() == TaskState::Working);

    let completed = service.complete(task_id, None).await?;
    ensure!(completed.state() == TaskState::Completed);
    Ok(())
}
