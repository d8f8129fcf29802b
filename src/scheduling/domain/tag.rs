//! Preference and category tags.

use super::SchedulingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized preference or category token.
///
/// Tags are trimmed and lower-cased on construction so `History` and
/// `history` compare equal, and sets of tags iterate in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Creates a validated, normalized tag.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingDomainError::EmptyTag`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, SchedulingDomainError> {
        let normalized = value.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(SchedulingDomainError::EmptyTag);
        }
        Ok(Self(normalized))
    }

    /// Returns the tag as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
