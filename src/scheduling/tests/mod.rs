//! Unit tests for the scheduling subsystem.

mod fixtures;

mod registry_tests;
