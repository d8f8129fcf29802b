//! Transport implementations of the message bus port.

pub mod http;
pub mod memory;

pub use http::{DeliveryMode, HttpTransport};
pub use memory::InProcessBus;
