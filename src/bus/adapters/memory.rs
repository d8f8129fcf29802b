//! In-process message bus.

use crate::bus::message::{Envelope, Topic};
use crate::bus::ports::{
    BusError, BusResult, MessageBus, MessageHandler, Subscription, SubscriptionId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

type SubscriberTable = HashMap<Topic, Vec<(SubscriptionId, Arc<dyn MessageHandler>)>>;

/// In-process transport delivering to every subscriber of a topic.
///
/// Delivery is at-least-once per subscriber; a handler that fails is
/// isolated (logged, delivery to the remaining subscribers continues), and
/// publishing to a topic nobody subscribes to is a logged no-op.
#[derive(Clone, Default)]
pub struct InProcessBus {
    subscribers: Arc<RwLock<SubscriberTable>>,
}

impl InProcessBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handlers_for(&self, topic: Topic) -> BusResult<Vec<(SubscriptionId, Arc<dyn MessageHandler>)>> {
        let table = self
            .subscribers
            .read()
            .map_err(|err| BusError::LockPoisoned(err.to_string()))?;
        Ok(table.get(&topic).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MessageBus for InProcessBus {
    async fn publish(&self, topic: Topic, envelope: Envelope) -> BusResult<()> {
        let handlers = self.handlers_for(topic)?;
        if handlers.is_empty() {
            debug!(topic = topic.as_str(), "publish with no subscribers; dropping");
            return Ok(());
        }
        for (subscription_id, handler) in handlers {
            if let Err(err) = handler.handle(&envelope).await {
                warn!(
                    topic = topic.as_str(),
                    subscription = %subscription_id,
                    error = %err,
                    "subscriber handler failed; continuing delivery"
                );
            }
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: Topic,
        handler: Arc<dyn MessageHandler>,
    ) -> BusResult<Subscription> {
        let mut table = self
            .subscribers
            .write()
            .map_err(|err| BusError::LockPoisoned(err.to_string()))?;
        let id = SubscriptionId::new();
        table.entry(topic).or_default().push((id, handler));
        Ok(Subscription::new(id, topic))
    }

    async fn unsubscribe(&self, subscription: &Subscription) -> BusResult<()> {
        let mut table = self
            .subscribers
            .write()
            .map_err(|err| BusError::LockPoisoned(err.to_string()))?;
        let handlers = table
            .get_mut(&subscription.topic())
            .ok_or(BusError::UnknownSubscription(subscription.id()))?;
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id());
        if handlers.len() == before {
            return Err(BusError::UnknownSubscription(subscription.id()));
        }
        Ok(())
    }
}
