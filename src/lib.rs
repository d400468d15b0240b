use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod mcp;
pub mod registry;
pub mod secrets;
pub mod stdio;

pub use stdio::serve;

use registry::Registry;
use secrets::SecretSource;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub secrets: Arc<dyn SecretSource>,
}

impl AppState {
    pub fn new(registry: Registry, secrets: Arc<dyn SecretSource>) -> Self {
        Self {
            registry: Arc::new(registry),
            secrets,
        }
    }
}
