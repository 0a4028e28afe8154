mod types;

pub use types::*;

use crate::Result;
use std::{env, path::Path};
use tracing::debug;

/// Loads the configuration named by `CONFIG_PATH` (default `config.yaml`).
///
/// A missing default file yields the built-in defaults; an explicitly named
/// file must exist. `SCALER_PATH` and `CLASSIFIER_PATH` override the model
/// artifact locations.
pub async fn load() -> Result<Config> {
    let mut config = match env::var("CONFIG_PATH") {
        Ok(path) => load_from(&path).await?,
        Err(_) if Path::new("config.yaml").exists() => load_from("config.yaml").await?,
        Err(_) => {
            debug!("No config.yaml found, using defaults");
            Config::default()
        }
    };

    if let Ok(path) = env::var("SCALER_PATH") {
        config.model.scaler_path = path;
    }
    if let Ok(path) = env::var("CLASSIFIER_PATH") {
        config.model.classifier_path = path;
    }

    Ok(config)
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path).await?;
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}
