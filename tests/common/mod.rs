//! Common test utilities for rtms-collector integration tests

#[allow(dead_code)]
pub mod fixtures;

pub use fixtures::*;
