//! Adapter implementations for the task subsystem ports.

pub mod memory;

pub use memory::InMemoryTaskRepository;
