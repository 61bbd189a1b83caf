use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::info;

use super::{types::Config, ConfigError};

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("BREWDEX_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Resolve the configuration for startup.
///
/// An explicitly named file must exist; when no path is given, the
/// default file is used if present and built-in defaults otherwise.
/// Environment overrides apply in every case.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path)
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!("Loading configuration from {:?}", DEFAULT_CONFIG_FILE);
            load_config(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => {
            info!("No config file found, using defaults");
            Figment::new()
                .merge(Env::prefixed("BREWDEX_").split("_"))
                .extract()
                .map_err(|e| ConfigError::ParseError(e.to_string()))
        }
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
