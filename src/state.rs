use std::sync::Arc;

use crate::{config::RequestDefaults, providers::Provider};

/// Shared by every request; built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub defaults: RequestDefaults,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>, defaults: RequestDefaults) -> Self {
        Self { provider, defaults }
    }
}
