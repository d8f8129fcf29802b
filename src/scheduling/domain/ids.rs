//! Identifier and validated scalar types for the scheduling domain.

use super::SchedulingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Normalizes an identifier-like string, returning `None` when empty.
fn normalize(value: impl Into<String>) -> Option<String> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Unique identifier a tourist agent publishes requests under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouristId(String);

impl TouristId {
    /// Creates a validated tourist identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::EmptyTouristId`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, SchedulingDomainError> {
        normalize(value)
            .map(Self)
            .ok_or(SchedulingDomainError::EmptyTouristId)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TouristId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TouristId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier a guide agent publishes offers under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuideId(String);

impl GuideId {
    /// Creates a validated guide identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::EmptyGuideId`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, SchedulingDomainError> {
        normalize(value)
            .map(Self)
            .ok_or(SchedulingDomainError::EmptyGuideId)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GuideId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GuideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference naming the activity an assignment books.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityRef(String);

impl ActivityRef {
    /// Creates a validated activity reference.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::EmptyActivityRef`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, SchedulingDomainError> {
        normalize(value)
            .map(Self)
            .ok_or(SchedulingDomainError::EmptyActivityRef)
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one atomic matching pass output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(Uuid);

impl ProposalId {
    /// Creates a new random proposal identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a proposal identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ProposalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
