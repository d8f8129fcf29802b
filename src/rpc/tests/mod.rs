//! Unit tests for the JSON-RPC surface.

mod dispatcher_tests;
mod protocol_tests;
