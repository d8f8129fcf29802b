//! Topic-based message bus connecting the scheduling agents.
//!
//! Producers publish [`message::Envelope`] values to typed [`message::Topic`]s
//! and consumers register [`ports::MessageHandler`]s; the active transport is
//! selected by configuration, never by the calling code.

pub mod adapters;
pub mod message;
pub mod ports;

#[cfg(test)]
mod tests;

use crate::config::{BusConfig, TransportKind};
use adapters::{DeliveryMode, HttpTransport, InProcessBus};
use mockable::DefaultClock;
use ports::{BusResult, MessageBus};
use std::sync::Arc;

/// Builds the transport selected by configuration.
///
/// # Errors
///
/// Returns a bus error when a network transport's HTTP client cannot be
/// built.
pub fn build_bus(config: &BusConfig) -> BusResult<Arc<dyn MessageBus>> {
    match config.transport {
        TransportKind::InProcess => Ok(Arc::new(InProcessBus::new())),
        TransportKind::Http => Ok(Arc::new(HttpTransport::new(
            config,
            DeliveryMode::Direct,
            Arc::new(DefaultClock),
        )?)),
        TransportKind::Slim => Ok(Arc::new(HttpTransport::new(
            config,
            DeliveryMode::Group,
            Arc::new(DefaultClock),
        )?)),
    }
}
