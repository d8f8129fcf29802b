//! A2A JSON-RPC 2.0 surface.

mod dispatcher;
pub mod protocol;

pub use dispatcher::Dispatcher;

#[cfg(test)]
mod tests;
