//! Orchestration services for the task subsystem.

mod lifecycle;

pub use lifecycle::{
    DEFAULT_MAX_AUTH_RETRIES, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
