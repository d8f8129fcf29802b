//! Unit tests for the message bus.
