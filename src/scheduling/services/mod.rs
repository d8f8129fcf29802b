//! Scheduling services.

mod scheduler;

pub use scheduler::{SchedulerError, SchedulerResult, SchedulerService};
