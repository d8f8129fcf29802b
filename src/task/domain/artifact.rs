//! Artifacts attached to a completed negotiation.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A structured output attached to a task, typically the finalized
/// assignment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    artifact_id: Uuid,
    name: String,
    data: Value,
}

impl Artifact {
    /// Creates a validated artifact.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyArtifactName`] when the name is empty
    /// after trimming.
    pub fn new(name: impl Into<String>, data: Value) -> Result<Self, TaskDomainError> {
        let normalized = name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyArtifactName);
        }
        Ok(Self {
            artifact_id: Uuid::new_v4(),
            name: normalized,
            data,
        })
    }

    /// Returns the artifact identifier.
    #[must_use]
    pub const fn artifact_id(&self) -> Uuid {
        self.artifact_id
    }

    /// Returns the artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the artifact payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }
}
