//! A2A task lifecycle management.
//!
//! Tracks each negotiation as a task through the A2A state machine:
//! submission, working, input-required round trips, authorization holds,
//! and the four terminal outcomes. Terminal tasks reject every further
//! operation with a typed "cannot be continued" error. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
