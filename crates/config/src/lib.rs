use std::path::Path;

use thiserror::Error;

mod paths;
mod schema;

pub use paths::{CONFIG_PATH_ENV, config_path};
pub use schema::{
    API_URL_ENV, ClientConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS, REQUEST_TIMEOUT_ENV,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Will always return config, falling back to defaults on missing/invalid files.
pub fn load_config_from_file(config_path: &Path) -> ClientConfig {
    match std::fs::read_to_string(config_path) {
        Ok(raw_config) => ClientConfig::from_raw(&raw_config),
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                tracing::info!("No config file at {}, using defaults", config_path.display());
            } else {
                tracing::warn!("Failed to read config file: {}", err);
            }
            ClientConfig::default()
        }
    }
}

/// Saves the config to the given path, creating parent directories.
pub fn save_config_to_file(config: &ClientConfig, config_path: &Path) -> Result<(), ConfigError> {
    let normalized = config.clone().normalized();
    normalized.validate()?;
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw_config = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(config_path, raw_config)?;
    Ok(())
}

/// File at [`config_path`], then environment overrides.
pub fn load() -> Result<ClientConfig, ConfigError> {
    let config = load_config_from_file(&config_path())
        .with_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
