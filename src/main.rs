use std::{io, sync::Arc};

use api_keys_mcp::{config::Config, logging, serve, AppState};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env();
    let secrets = config.load_secret_source();
    let registry = config.load_registry()?;

    info!(
        env_file = %config.env_file.display(),
        env_file_values = secrets.fallback_len(),
        registry_entries = registry.len(),
        custom_registry = config.registry_file.is_some(),
        "server starting"
    );

    let state = AppState::new(registry, Arc::new(secrets));
    serve(&state, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
