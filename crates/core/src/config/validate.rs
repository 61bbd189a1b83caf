use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Sync endpoint URLs are http(s)
/// - Sync batch size and staleness window are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Sync validation
    for (field, url) in [
        ("sync.formula_url", &config.sync.formula_url),
        ("sync.cask_url", &config.sync.cask_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be an http(s) URL, got '{url}'"
            )));
        }
    }

    if config.sync.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "sync.batch_size cannot be 0".to_string(),
        ));
    }

    if config.sync.staleness_hours == 0 {
        return Err(ConfigError::ValidationError(
            "sync.staleness_hours cannot be 0".to_string(),
        ));
    }

    Ok(())
}
