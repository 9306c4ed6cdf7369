use std::sync::Arc;

use paperpull_core::{Config, TokenStore};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: Config,
    pub tokens: Arc<dyn TokenStore>,
}
