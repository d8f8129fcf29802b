//! Message bus port: the transport-agnostic publish/subscribe contract.

use crate::bus::message::{Envelope, Topic};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;

/// Errors raised by bus transports and handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// The subscriber table lock was poisoned.
    #[error("bus lock poisoned: {0}")]
    LockPoisoned(String),

    /// The subscription is not registered with this bus.
    #[error("unknown subscription: {0}")]
    UnknownSubscription(SubscriptionId),

    /// A payload failed to serialize or deserialize.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// A subscriber handler failed; isolated per subscriber by transports.
    #[error("handler failure: {0}")]
    Handler(String),
}

/// Opaque identifier for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Creates a new random subscription identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by [`MessageBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
    topic: Topic,
}

impl Subscription {
    /// Creates a subscription handle.
    #[must_use]
    pub const fn new(id: SubscriptionId, topic: Topic) -> Self {
        Self { id, topic }
    }

    /// Returns the subscription identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.topic
    }
}

/// A subscriber's message callback.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handles one delivered envelope.
    ///
    /// # Errors
    ///
    /// May return [`BusError::Handler`]; transports isolate the failure to
    /// this subscriber and continue delivering to the rest.
    async fn handle(&self, envelope: &Envelope) -> BusResult<()>;
}

/// Publish/subscribe contract every transport implements.
///
/// Producers and consumers hold `Arc<dyn MessageBus>`, so the active
/// transport is swappable by configuration without touching their code.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes an envelope to every subscriber of a topic.
    ///
    /// Publishing to a topic with no reachable subscribers degrades to a
    /// logged no-op; it never blocks the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`BusError`] only for local faults such as a poisoned
    /// subscriber table; remote delivery failures are logged and absorbed.
    async fn publish(&self, topic: Topic, envelope: Envelope) -> BusResult<()>;

    /// Registers a handler for a topic.
    ///
    /// Delivery is at-least-once per subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::LockPoisoned`] when the subscriber table is
    /// unavailable.
    async fn subscribe(
        &self,
        topic: Topic,
        handler: Arc<dyn MessageHandler>,
    ) -> BusResult<Subscription>;

    /// Removes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UnknownSubscription`] when the handle is not
    /// registered with this bus.
    async fn unsubscribe(&self, subscription: &Subscription) -> BusResult<()>;
}
