//! Messages exchanged within a negotiation task.

use super::{MessageId, TaskDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The party a message originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The requesting party (the remote agent addressing this task).
    User,
    /// The serving party (the agent that owns the task).
    Agent,
}

/// One message in a task's negotiation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2aMessage {
    message_id: MessageId,
    role: Role,
    content: String,
    sent_at: DateTime<Utc>,
}

impl A2aMessage {
    /// Creates a validated message stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyMessageContent`] when the content is
    /// empty after trimming.
    pub fn new(
        role: Role,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let body = content.into();
        if body.trim().is_empty() {
            return Err(TaskDomainError::EmptyMessageContent);
        }
        Ok(Self {
            message_id: MessageId::new(),
            role,
            content: body,
            sent_at: clock.utc(),
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Returns the originating role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was sent.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}
