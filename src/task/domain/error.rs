//! Domain error types for the task subsystem.

use super::{TaskId, TaskState};
use thiserror::Error;

/// Errors raised by the task aggregate and its value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskDomainError {
    /// The requested state change is not permitted by the lifecycle.
    #[error("invalid task state transition for {task_id}: {from:?} -> {to:?}")]
    InvalidStateTransition {
        /// Task the transition was attempted on.
        task_id: TaskId,
        /// Current state.
        from: TaskState,
        /// Requested state.
        to: TaskState,
    },

    /// The task has reached a terminal state and accepts nothing further.
    #[error("task {task_id} cannot be continued from terminal state {state:?}")]
    CannotBeContinued {
        /// Task the operation was addressed to.
        task_id: TaskId,
        /// The terminal state the task rests in.
        state: TaskState,
    },

    /// An authorization resolution was reported for a task that is not
    /// awaiting authorization.
    #[error("task {0} is not awaiting authorization")]
    NotAwaitingAuthorization(TaskId),

    /// Input was provided for a task that is not awaiting input.
    #[error("task {0} is not awaiting input")]
    NotAwaitingInput(TaskId),

    /// A message body was empty after trimming.
    #[error("message content cannot be empty")]
    EmptyMessageContent,

    /// An artifact name was empty after trimming.
    #[error("artifact name cannot be empty")]
    EmptyArtifactName,
}

/// Error raised when parsing a task state from its string form fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised task state: {0}")]
pub struct ParseTaskStateError(pub String);
