// Application state module
// Shared by every connection for the lifetime of the server

use std::sync::Arc;

use super::types::Config;
use crate::plugin::Plugin;

/// Application state
pub struct AppState {
    pub config: Config,
    /// The hosted plugin instance, created once at startup
    pub plugin: Arc<dyn Plugin>,
}

impl AppState {
    pub fn new(config: &Config, plugin: Arc<dyn Plugin>) -> Self {
        Self {
            config: config.clone(),
            plugin,
        }
    }
}
