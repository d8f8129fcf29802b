//! Domain types for the task subsystem.
//!
//! Pure types with no infrastructure dependencies; the lifecycle state
//! machine lives on the [`Task`] aggregate and is reusable by any agent
//! that must track A2A task progress.

mod artifact;
mod error;
mod ids;
mod message;
mod task;

pub use artifact::Artifact;
pub use error::{ParseTaskStateError, TaskDomainError};
pub use ids::{ContextId, MessageId, TaskId};
pub use message::{A2aMessage, Role};
pub use task::{Task, TaskState};
