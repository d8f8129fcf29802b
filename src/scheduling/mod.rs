//! Tourist/guide scheduling: domain model, registry, matching, wiring.

pub mod domain;
pub mod engine;
pub mod registry;
pub mod services;

#[cfg(test)]
mod tests;
