//! Port contracts for the message bus.

mod transport;

pub use transport::{
    BusError, BusResult, MessageBus, MessageHandler, Subscription, SubscriptionId,
};
