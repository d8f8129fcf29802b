//! Domain error types for the scheduling subsystem.

use thiserror::Error;

/// Errors raised while constructing or combining scheduling domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingDomainError {
    /// A tourist identifier was empty after trimming.
    #[error("tourist identifier cannot be empty")]
    EmptyTouristId,

    /// A guide identifier was empty after trimming.
    #[error("guide identifier cannot be empty")]
    EmptyGuideId,

    /// An activity reference was empty after trimming.
    #[error("activity reference cannot be empty")]
    EmptyActivityRef,

    /// A preference or category tag was empty after trimming.
    #[error("tag cannot be empty")]
    EmptyTag,

    /// A monetary amount was negative.
    #[error("monetary amount cannot be negative: {0}")]
    NegativeAmount(i64),

    /// A monetary computation overflowed the cents representation.
    #[error("monetary arithmetic overflowed")]
    AmountOverflow,

    /// A time window did not end strictly after it started.
    #[error("time window must end after it starts: {start} >= {end}")]
    InvalidTimeWindow {
        /// Window start as supplied.
        start: chrono::DateTime<chrono::Utc>,
        /// Window end as supplied.
        end: chrono::DateTime<chrono::Utc>,
    },

    /// A duration given in minutes was zero or negative.
    #[error("duration must be a positive number of minutes: {0}")]
    InvalidDuration(i64),

    /// A guide offer declared a zero group capacity.
    #[error("guide {0} declared a zero group capacity")]
    ZeroGroupCapacity(String),
}
