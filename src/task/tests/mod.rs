//! Unit tests for the task subsystem.
