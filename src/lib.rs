//! Cicerone: multi-agent tourist/guide scheduling core.
//!
//! This crate provides the coordination layer for a set of tourist and
//! guide agents: a topic-based message bus, an agent registry, a
//! deterministic greedy matching engine, and an A2A task lifecycle with a
//! JSON-RPC surface.
//!
//! # Architecture
//!
//! Cicerone follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (transports, storage)
//!
//! # Modules
//!
//! - [`bus`]: Typed topics, envelopes, and the pluggable transports
//! - [`scheduling`]: Registry, matching engine, and the scheduler service
//! - [`task`]: A2A task state machine and lifecycle service
//! - [`rpc`]: JSON-RPC 2.0 surface for task management
//! - [`notification`]: Outbound state events and the sink port
//! - [`config`]: Environment-driven runtime configuration

pub mod bus;
pub mod config;
pub mod notification;
pub mod rpc;
pub mod scheduling;
pub mod task;
