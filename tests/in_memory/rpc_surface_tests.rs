//! End-to-end JSON-RPC surface tests over the in-memory repository.

use std::sync::Arc;

use cicerone::rpc::protocol::{JsonRpcRequest, JsonRpcResponse, TASK_CANNOT_BE_CONTINUED};
use cicerone::rpc::Dispatcher;
use cicerone::task::adapters::memory::InMemoryTaskRepository;
use cicerone::task::services::TaskLifecycleService;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{json, Value};

type TestDispatcher = Dispatcher<InMemoryTaskRepository, DefaultClock>;

#[fixture]
fn dispatcher() -> TestDispatcher {
    Dispatcher::new(TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    ))
}

fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(json!(id), method, params)
}

fn task_id_of(response: &JsonRpcResponse) -> eyre::Result<String> {
    response
        .result
        .as_ref()
        .and_then(|result| result.get("task_id"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| eyre::eyre!("response carries a task id"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_task_opened_over_rpc_is_readable_and_cancelable(
    dispatcher: TestDispatcher,
) -> eyre::Result<()> {
    let opened = dispatcher
        .dispatch(request(
            1,
            "message/send",
            json!({"content": "plan a harbour walk"}),
        ))
        .await;
    ensure!(!opened.is_error());
    let task_id = task_id_of(&opened)?;

    let fetched = dispatcher
        .dispatch(request(2, "tasks/get", json!({"task_id": task_id})))
        .await;
    ensure!(!fetched.is_error());
    ensure!(fetched.id == json!(2));

    let canceled = dispatcher
        .dispatch(request(3, "tasks/cancel", json!({"task_id": task_id})))
        .await;
    ensure!(!canceled.is_error());

    let too_late = dispatcher
        .dispatch(request(
            4,
            "message/send",
            json!({"task_id": task_id, "content": "one more thing"}),
        ))
        .await;
    ensure!(
        too_late.error.as_ref().map(|error| error.code) == Some(TASK_CANNOT_BE_CONTINUED)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conversations_continue_across_messages(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let opened = dispatcher
        .dispatch(request(
            1,
            "message/send",
            json!({"content": "looking for a river cruise"}),
        ))
        .await;
    let task_id = task_id_of(&opened)?;

    let follow_up = dispatcher
        .dispatch(request(
            2,
            "message/send",
            json!({"task_id": task_id, "content": "ideally before noon"}),
        ))
        .await;

    ensure!(!follow_up.is_error());
    let history_len = follow_up
        .result
        .as_ref()
        .and_then(|result| result.get("message_history"))
        .and_then(Value::as_array)
        .map(Vec::len);
    ensure!(history_len == Some(2));
    Ok(())
}
