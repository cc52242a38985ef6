//! Application state for the API server

use crate::{Collector, Config};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Collector that performs runs and owns the database handle
    pub collector: Arc<Collector>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(collector: Arc<Collector>, config: Arc<Config>) -> Self {
        Self { collector, config }
    }
}
