//! Unit tests for the JSON-RPC dispatcher.

use crate::bus::adapters::InProcessBus;
use crate::bus::message::{Envelope, Topic, WireMessage};
use crate::bus::ports::{BusResult, MessageBus, MessageHandler};
use crate::rpc::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    TASK_CANNOT_BE_CONTINUED, TASK_NOT_FOUND,
};
use crate::rpc::Dispatcher;
use crate::scheduling::domain::TouristId;
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::task::domain::{ContextId, Role, TaskId};
use crate::task::services::TaskLifecycleService;
use async_trait::async_trait;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

type TestService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;
type TestDispatcher = Dispatcher<InMemoryTaskRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    )
}

fn request(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(json!(1), method, params)
}

fn error_code(response: &JsonRpcResponse) -> Option<i64> {
    response.error.as_ref().map(|error| error.code)
}

fn result_state(response: &JsonRpcResponse) -> Option<&str> {
    response
        .result
        .as_ref()
        .and_then(|result| result.get("state"))
        .and_then(Value::as_str)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn message_send_without_task_id_opens_a_task(service: TestService) -> eyre::Result<()> {
    let dispatcher = TestDispatcher::new(service);

    let response = dispatcher
        .dispatch(request(
            "message/send",
            json!({"content": "book a walking tour"}),
        ))
        .await;

    ensure!(!response.is_error());
    ensure!(result_state(&response) == Some("submitted"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn message_send_resumes_a_task_awaiting_input(service: TestService) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "initial request")
        .await?;
    service.begin_work(task.task_id()).await?;
    service.require_input(task.task_id()).await?;
    let dispatcher = TestDispatcher::new(service);

    let response = dispatcher
        .dispatch(request(
            "message/send",
            json!({"task_id": task.task_id().into_inner(), "content": "saturday afternoon"}),
        ))
        .await;

    ensure!(!response.is_error());
    ensure!(result_state(&response) == Some("working"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn message_send_to_terminal_task_cannot_be_continued(
    service: TestService,
) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "short-lived request")
        .await?;
    service.cancel(task.task_id()).await?;
    let dispatcher = TestDispatcher::new(service);

    let response = dispatcher
        .dispatch(request(
            "message/send",
            json!({"task_id": task.task_id().into_inner(), "content": "hello again"}),
        ))
        .await;

    ensure!(error_code(&response) == Some(TASK_CANNOT_BE_CONTINUED));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_get_returns_the_stored_task(service: TestService) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "fetch me later")
        .await?;
    let dispatcher = TestDispatcher::new(service);

    let response = dispatcher
        .dispatch(request(
            "tasks/get",
            json!({"task_id": task.task_id().into_inner()}),
        ))
        .await;

    ensure!(!response.is_error());
    let result = response.result.ok_or_else(|| eyre::eyre!("result set"))?;
    ensure!(
        result.get("task_id").and_then(Value::as_str)
            == Some(task.task_id().to_string().as_str())
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_get_for_unknown_task_reports_not_found(service: TestService) -> eyre::Result<()> {
    let dispatcher = TestDispatcher::new(service);

    let response = dispatcher
        .dispatch(request(
            "tasks/get",
            json!({"task_id": TaskId::new().into_inner()}),
        ))
        .await;

    ensure!(error_code(&response) == Some(TASK_NOT_FOUND));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_cancel_transitions_and_then_refuses_repeats(
    service: TestService,
) -> eyre::Result<()> {
    let task = service
        .submit(ContextId::new(), Role::User, "cancel me")
        .await?;
    let dispatcher = TestDispatcher::new(service);
    let params = json!({"task_id": task.task_id().into_inner()});

    let first = dispatcher.dispatch(request("tasks/cancel", params.clone())).await;
    let second = dispatcher.dispatch(request("tasks/cancel", params)).await;

    ensure!(result_state(&first) == Some("canceled"));
    ensure!(error_code(&second) == Some(TASK_CANNOT_BE_CONTINUED));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_method_is_reported(service: TestService) -> eyre::Result<()> {
    let dispatcher = TestDispatcher::new(service);

    let response = dispatcher.dispatch(request("tasks/list", json!({}))).await;

    ensure!(error_code(&response) == Some(METHOD_NOT_FOUND));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_params_are_rejected(service: TestService) -> eyre::Result<()> {
    let dispatcher = TestDispatcher::new(service);

    let missing_content = dispatcher.dispatch(request("message/send", json!({}))).await;
    let bad_id = dispatcher
        .dispatch(request("tasks/get", json!({"task_id": "not-a-uuid"})))
        .await;

    ensure!(error_code(&missing_content) == Some(INVALID_PARAMS));
    ensure!(error_code(&bad_id) == Some(INVALID_PARAMS));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_protocol_version_is_an_invalid_request(service: TestService) -> eyre::Result<()> {
    let dispatcher = TestDispatcher::new(service);
    let mut malformed = request("tasks/get", json!({"task_id": Uuid::new_v4()}));
    malformed.jsonrpc = "1.0".to_owned();

    let response = dispatcher.dispatch(malformed).await;

    ensure!(error_code(&response) == Some(INVALID_REQUEST));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn error_on_one_task_leaves_others_untouched(service: TestService) -> eyre::Result<()> {
    let healthy = service
        .submit(ContextId::new(), Role::User, "unaffected task")
        .await?;
    let doomed = service
        .submit(ContextId::new(), Role::User, "doomed task")
        .await?;
    service.cancel(doomed.task_id()).await?;
    let dispatcher = TestDispatcher::new(service);

    let failure = dispatcher
        .dispatch(request(
            "message/send",
            json!({"task_id": doomed.task_id().into_inner(), "content": "too late"}),
        ))
        .await;
    let lookup = dispatcher
        .dispatch(request(
            "tasks/get",
            json!({"task_id": healthy.task_id().into_inner()}),
        ))
        .await;

    ensure!(failure.is_error());
    ensure!(result_state(&lookup) == Some("submitted"));
    Ok(())
}

/// Handler that counts deliveries.
#[derive(Default)]
struct Counter {
    deliveries: AtomicUsize,
}

#[async_trait]
impl MessageHandler for Counter {
    async fn handle(&self, _envelope: &Envelope) -> BusResult<()> {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inbound_envelopes_reach_local_subscribers(service: TestService) -> eyre::Result<()> {
    let bus = Arc::new(InProcessBus::new());
    let counter = Arc::new(Counter::default());
    bus.subscribe(Topic::TouristRequest, Arc::clone(&counter) as _)
        .await?;
    let dispatcher = TestDispatcher::new(service).with_inbound_bus(bus);

    let envelope = Envelope::new(
        WireMessage::LateArrival {
            tourist_id: TouristId::new("t1")?,
        },
        &DefaultClock,
    );
    let response = dispatcher
        .dispatch(request(
            "message/send",
            json!({"topic": "tourist.request", "envelope": envelope}),
        ))
        .await;

    ensure!(!response.is_error());
    ensure!(response.result == Some(json!({"delivered": true})));
    ensure!(counter.deliveries.load(Ordering::SeqCst) == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn envelopes_without_an_inbound_bus_are_rejected(service: TestService) -> eyre::Result<()> {
    let dispatcher = TestDispatcher::new(service);
    let envelope = Envelope::new(
        WireMessage::LateArrival {
            tourist_id: TouristId::new("t1")?,
        },
        &DefaultClock,
    );

    let response = dispatcher
        .dispatch(request(
            "message/send",
            json!({"topic": "tourist.request", "envelope": envelope}),
        ))
        .await;

    ensure!(error_code(&response) == Some(INVALID_PARAMS));
    Ok(())
}
