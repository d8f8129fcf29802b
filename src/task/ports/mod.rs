//! Port contracts for the task subsystem.

mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
