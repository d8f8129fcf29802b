//! Service layer driving tasks through the A2A lifecycle.

use crate::task::{
    domain::{A2aMessage, Artifact, ContextId, Role, Task, TaskDomainError, TaskId, TaskState},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Authorization failures absorbed before a task fails, by default.
pub const DEFAULT_MAX_AUTH_RETRIES: u32 = 3;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Reusable by any agent that must track A2A task progress; the scheduler
/// owns its own instance for negotiation tasks.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    max_auth_retries: u32,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service with default retry bounds.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            max_auth_retries: DEFAULT_MAX_AUTH_RETRIES,
        }
    }

    /// Overrides the bounded authorization retry count.
    #[must_use]
    pub const fn with_max_auth_retries(mut self, max_retries: u32) -> Self {
        self.max_auth_retries = max_retries;
        self
    }

    /// Creates a task in `Submitted` state from an opening message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when message validation fails or the
    /// repository rejects the store.
    pub async fn submit(
        &self,
        context_id: ContextId,
        role: Role,
        content: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let message = A2aMessage::new(role, content, &*self.clock)?;
        let task = Task::new(context_id, message, &*self.clock);
        self.repository.store(&task).await?;
        Ok(task)
    }

    /// Moves a submitted task into `Working`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or the
    /// lifecycle forbids the move.
    pub async fn begin_work(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskState::Working).await
    }

    /// Parks a working task awaiting another round trip.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or the
    /// lifecycle forbids the move.
    pub async fn require_input(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskState::InputRequired).await
    }

    /// Delivers the awaited input, resuming work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAwaitingInput`] when the task is not
    /// parked in `InputRequired`, wrapped in [`TaskLifecycleError::Domain`].
    pub async fn provide_input(
        &self,
        task_id: TaskId,
        role: Role,
        content: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        if task.state() != TaskState::InputRequired {
            if task.state().is_terminal() {
                return Err(TaskDomainError::CannotBeContinued {
                    task_id,
                    state: task.state(),
                }
                .into());
            }
            return Err(TaskDomainError::NotAwaitingInput(task_id).into());
        }
        let message = A2aMessage::new(role, content, &*self.clock)?;
        task.transition_to(TaskState::Working, &*self.clock)?;
        task.append_message(message, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Appends a message to an in-flight task without changing its state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CannotBeContinued`] for terminal tasks,
    /// wrapped in [`TaskLifecycleError::Domain`].
    pub async fn append_message(
        &self,
        task_id: TaskId,
        role: Role,
        content: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let message = A2aMessage::new(role, content, &*self.clock)?;
        task.append_message(message, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Completes a task, optionally attaching a final artifact.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or not in a
    /// state the lifecycle allows completing from.
    pub async fn complete(
        &self,
        task_id: TaskId,
        artifact: Option<Artifact>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        if let Some(output) = artifact {
            task.attach_artifact(output, &*self.clock)?;
        }
        task.transition_to(TaskState::Completed, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Fails a task on an unrecoverable processing error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or already
    /// terminal.
    pub async fn fail(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskState::Failed).await
    }

    /// Cancels a task.
    ///
    /// The local transition is immediate; notifying remote parties is the
    /// caller's fire-and-forget concern and is never awaited here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or already
    /// terminal.
    pub async fn cancel(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskState::Canceled).await
    }

    /// Rejects a task that has not started processing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown or has left
    /// `Submitted`.
    pub async fn reject(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskState::Rejected).await
    }

    /// Records an external authorization failure against a task.
    ///
    /// The task parks in `AuthRequired` and fails once the bounded retry
    /// count is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, terminal, or
    /// in a state that cannot enter authorization.
    pub async fn report_auth_failure(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.record_auth_failure(self.max_auth_retries, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Resumes a task parked in `AuthRequired` after authorization succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAwaitingAuthorization`] when the task is
    /// not awaiting authorization, wrapped in [`TaskLifecycleError::Domain`].
    pub async fn resolve_auth(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.resolve_auth(&*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task is unknown,
    /// wrapped in [`TaskLifecycleError::Repository`].
    pub async fn get(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.load(task_id).await
    }

    /// Returns all tasks in one conversation context.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when storage lookup fails.
    pub async fn list_by_context(&self, context_id: ContextId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_context_id(context_id).await?)
    }

    async fn transition(&self, task_id: TaskId, to: TaskState) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.transition_to(to, &*self.clock)?;
        self.repository.update(&task).await?;
        Ok(task)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(task_id).into())
    }
}
