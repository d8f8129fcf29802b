//! Task aggregate root and the A2A lifecycle state machine.

use super::{A2aMessage, Artifact, ContextId, ParseTaskStateError, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A2A task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task has been created but processing has not begun.
    Submitted,
    /// Task is being processed.
    Working,
    /// The negotiation needs another round trip from the remote party.
    InputRequired,
    /// The negotiation finished with an accepted assignment.
    Completed,
    /// An unrecoverable processing error occurred.
    Failed,
    /// The task was cancelled on explicit request.
    Canceled,
    /// The task was declined before processing started.
    Rejected,
    /// An external authorization check failed; awaiting re-authorization.
    AuthRequired,
}

impl TaskState {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Working => "working",
            Self::InputRequired => "input_required",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Rejected => "rejected",
            Self::AuthRequired => "auth_required",
        }
    }

    /// Returns whether the state accepts no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Canceled | Self::Rejected
        )
    }

    /// Returns whether the lifecycle permits moving to `to` from this state.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        match self {
            Self::Submitted => matches!(
                to,
                Self::Working
                    | Self::Rejected
                    | Self::Failed
                    | Self::Canceled
                    | Self::AuthRequired
            ),
            Self::Working => matches!(
                to,
                Self::InputRequired
                    | Self::Completed
                    | Self::Failed
                    | Self::Canceled
                    | Self::AuthRequired
            ),
            Self::InputRequired => matches!(to, Self::Working | Self::Failed | Self::Canceled),
            Self::AuthRequired => matches!(
                to,
                Self::Submitted | Self::Working | Self::Failed | Self::Canceled
            ),
            Self::Completed | Self::Failed | Self::Canceled | Self::Rejected => false,
        }
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "submitted" => Ok(Self::Submitted),
            "working" => Ok(Self::Working),
            "input_required" => Ok(Self::InputRequired),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "canceled" => Ok(Self::Canceled),
            "rejected" => Ok(Self::Rejected),
            "auth_required" => Ok(Self::AuthRequired),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Task aggregate root: one negotiation thread tracked through the A2A
/// lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    task_id: TaskId,
    context_id: ContextId,
    state: TaskState,
    message_history: Vec<A2aMessage>,
    artifacts: Vec<Artifact>,
    auth_retries: u32,
    resume_state: Option<TaskState>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `Submitted` state with an opening message.
    #[must_use]
    pub fn new(context_id: ContextId, opening_message: A2aMessage, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            task_id: TaskId::new(),
            context_id,
            state: TaskState::Submitted,
            message_history: vec![opening_message],
            artifacts: Vec::new(),
            auth_retries: 0,
            resume_state: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the conversation context this task belongs to.
    #[must_use]
    pub const fn context_id(&self) -> ContextId {
        self.context_id
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the negotiation history in arrival order.
    #[must_use]
    pub fn message_history(&self) -> &[A2aMessage] {
        &self.message_history
    }

    /// Returns the attached artifacts.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns how many authorization failures the task has absorbed.
    #[must_use]
    pub const fn auth_retries(&self) -> u32 {
        self.auth_retries
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to a new lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CannotBeContinued`] when the task is
    /// already terminal, or [`TaskDomainError::InvalidStateTransition`] when
    /// the lifecycle forbids the move.
    pub fn transition_to(
        &mut self,
        to: TaskState,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_continuable()?;
        if !self.state.can_transition_to(to) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.task_id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        self.touch(clock);
        Ok(())
    }

    /// Appends a message to the negotiation history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CannotBeContinued`] when the task is
    /// terminal; messages to finished tasks are rejected, never silently
    /// dropped.
    pub fn append_message(
        &mut self,
        message: A2aMessage,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_continuable()?;
        self.message_history.push(message);
        self.touch(clock);
        Ok(())
    }

    /// Attaches an artifact to the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CannotBeContinued`] when the task is
    /// terminal.
    pub fn attach_artifact(
        &mut self,
        artifact: Artifact,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_continuable()?;
        self.artifacts.push(artifact);
        self.touch(clock);
        Ok(())
    }

    /// Records an authorization failure.
    ///
    /// The first failure parks the task in [`TaskState::AuthRequired`] and
    /// remembers the state to resume. Once `max_retries` failures have been
    /// absorbed the task moves to [`TaskState::Failed`]. Returns the
    /// resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CannotBeContinued`] for terminal tasks and
    /// [`TaskDomainError::InvalidStateTransition`] when the current state
    /// cannot enter authorization (for example `InputRequired`).
    pub fn record_auth_failure(
        &mut self,
        max_retries: u32,
        clock: &impl Clock,
    ) -> Result<TaskState, TaskDomainError> {
        self.ensure_continuable()?;
        if self.state != TaskState::AuthRequired
            && !self.state.can_transition_to(TaskState::AuthRequired)
        {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.task_id,
                from: self.state,
                to: TaskState::AuthRequired,
            });
        }
        self.auth_retries = self.auth_retries.saturating_add(1);
        if self.auth_retries >= max_retries {
            self.force_fail(clock);
            return Ok(self.state);
        }
        if self.state == TaskState::AuthRequired {
            self.touch(clock);
            return Ok(self.state);
        }
        let prior = self.state;
        self.transition_to(TaskState::AuthRequired, clock)?;
        self.resume_state = Some(prior);
        Ok(self.state)
    }

    /// Resumes the task after authorization succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAwaitingAuthorization`] when the task is
    /// not parked in `AuthRequired`.
    pub fn resolve_auth(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.state != TaskState::AuthRequired {
            return Err(TaskDomainError::NotAwaitingAuthorization(self.task_id));
        }
        let target = self.resume_state.take().unwrap_or(TaskState::Working);
        self.transition_to(target, clock)?;
        self.auth_retries = 0;
        Ok(())
    }

    /// Moves a non-terminal task to `Failed` regardless of current state.
    fn force_fail(&mut self, clock: &impl Clock) {
        self.state = TaskState::Failed;
        self.resume_state = None;
        self.touch(clock);
    }

    /// Rejects any operation on a terminal task.
    const fn ensure_continuable(&self) -> Result<(), TaskDomainError> {
        if self.state.is_terminal() {
            return Err(TaskDomainError::CannotBeContinued {
                task_id: self.task_id,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
