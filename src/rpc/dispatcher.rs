//! Routes A2A JSON-RPC requests onto the task lifecycle service.

use crate::bus::message::{Envelope, Topic};
use crate::bus::ports::MessageBus;
use crate::rpc::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::task::domain::{Role, TaskDomainError, TaskId, TaskState};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::task::services::{TaskLifecycleError, TaskLifecycleService};
use mockable::Clock;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Parameters accepted by `message/send`.
///
/// Without `task_id` the message opens a new task; with it, the message
/// continues the addressed task. Inbound bus traffic instead carries a
/// `topic` and `envelope` pair.
#[derive(Debug, Deserialize)]
struct SendParams {
    task_id: Option<Uuid>,
    role: Option<Role>,
    content: Option<String>,
    topic: Option<String>,
    envelope: Option<Envelope>,
}

/// Parameters accepted by `tasks/get` and `tasks/cancel`.
#[derive(Debug, Deserialize)]
struct TaskParams {
    task_id: Uuid,
}

/// JSON-RPC dispatcher for the A2A task surface.
///
/// Every request yields a structured response; malformed input is answered
/// with an error object and never reaches the lifecycle service, and a
/// failure on one task never alters another task's state.
pub struct Dispatcher<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<R, C>,
    inbound: Option<Arc<dyn MessageBus>>,
}

impl<R, C> Dispatcher<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher over a task lifecycle service.
    #[must_use]
    pub const fn new(lifecycle: TaskLifecycleService<R, C>) -> Self {
        Self {
            lifecycle,
            inbound: None,
        }
    }

    /// Attaches the bus that receives inbound peer envelopes.
    #[must_use]
    pub fn with_inbound_bus(mut self, bus: Arc<dyn MessageBus>) -> Self {
        self.inbound = Some(bus);
        self
    }

    /// Handles one JSON-RPC request, always returning a response object.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request("jsonrpc version must be \"2.0\""),
            );
        }
        debug!(method = %request.method, "dispatching rpc request");
        let outcome = match request.method.as_str() {
            "message/send" => self.message_send(request.params).await,
            "tasks/get" => self.tasks_get(request.params).await,
            "tasks/cancel" => self.tasks_cancel(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };
        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        }
    }

    async fn message_send(&self, raw: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: SendParams = parse_params(raw)?;
        if params.envelope.is_some() || params.topic.is_some() {
            return self.deliver_envelope(params).await;
        }
        let content = params
            .content
            .ok_or_else(|| JsonRpcError::invalid_params("missing field: content"))?;
        let role = params.role.unwrap_or(Role::User);
        let task = match params.task_id {
            None => self
                .lifecycle
                .submit(crate::task::domain::ContextId::new(), role, content)
                .await
                .map_err(map_lifecycle_error)?,
            Some(task_id) => {
                let task_id = TaskId::from_uuid(task_id);
                let current = self.lifecycle.get(task_id).await.map_err(map_lifecycle_error)?;
                if current.state() == TaskState::InputRequired {
                    self.lifecycle
                        .provide_input(task_id, role, content)
                        .await
                        .map_err(map_lifecycle_error)?
                } else {
                    self.lifecycle
                        .append_message(task_id, role, content)
                        .await
                        .map_err(map_lifecycle_error)?
                }
            }
        };
        serde_json::to_value(&task).map_err(|err| JsonRpcError::internal(err.to_string()))
    }

    async fn deliver_envelope(&self, params: SendParams) -> Result<Value, JsonRpcError> {
        let bus = self
            .inbound
            .as_ref()
            .ok_or_else(|| JsonRpcError::invalid_params("this endpoint accepts no envelopes"))?;
        let topic_name = params
            .topic
            .ok_or_else(|| JsonRpcError::invalid_params("missing field: topic"))?;
        let topic = Topic::try_from(topic_name.as_str())
            .map_err(|err| JsonRpcError::invalid_params(err.to_string()))?;
        let envelope = params
            .envelope
            .ok_or_else(|| JsonRpcError::invalid_params("missing field: envelope"))?;
        bus.publish(topic, envelope)
            .await
            .map_err(|err| JsonRpcError::internal(err.to_string()))?;
        Ok(json!({ "delivered": true }))
    }

    async fn tasks_get(&self, raw: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: TaskParams = parse_params(raw)?;
        let task = self
            .lifecycle
            .get(TaskId::from_uuid(params.task_id))
            .await
            .map_err(map_lifecycle_error)?;
        serde_json::to_value(&task).map_err(|err| JsonRpcError::internal(err.to_string()))
    }

    async fn tasks_cancel(&self, raw: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: TaskParams = parse_params(raw)?;
        let task = self
            .lifecycle
            .cancel(TaskId::from_uuid(params.task_id))
            .await
            .map_err(map_lifecycle_error)?;
        serde_json::to_value(&task).map_err(|err| JsonRpcError::internal(err.to_string()))
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(raw: Option<Value>) -> Result<T, JsonRpcError> {
    let value = raw.ok_or_else(|| JsonRpcError::invalid_params("params are required"))?;
    serde_json::from_value(value).map_err(|err| JsonRpcError::invalid_params(err.to_string()))
}

fn map_lifecycle_error(error: TaskLifecycleError) -> JsonRpcError {
    match error {
        TaskLifecycleError::Repository(TaskRepositoryError::NotFound(task_id)) => {
            JsonRpcError::task_not_found(task_id)
        }
        TaskLifecycleError::Domain(TaskDomainError::CannotBeContinued { task_id, .. }) => {
            JsonRpcError::task_cannot_be_continued(task_id)
        }
        TaskLifecycleError::Domain(domain) => JsonRpcError::invalid_params(domain.to_string()),
        TaskLifecycleError::Repository(repository) => {
            JsonRpcError::internal(repository.to_string())
        }
    }
}
