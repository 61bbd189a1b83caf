use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("brewdex.db")
}

/// Catalog sync configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Remote formula index URL.
    #[serde(default = "default_formula_url")]
    pub formula_url: String,
    /// Remote cask index URL.
    #[serde(default = "default_cask_url")]
    pub cask_url: String,
    /// Maximum age of a successful sync before an automatic refresh.
    #[serde(default = "default_staleness_hours")]
    pub staleness_hours: u64,
    /// Records written per storage batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fetch timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            formula_url: default_formula_url(),
            cask_url: default_cask_url(),
            staleness_hours: default_staleness_hours(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_formula_url() -> String {
    "https://formulae.brew.sh/api/formula.json".to_string()
}

fn default_cask_url() -> String {
    "https://formulae.brew.sh/api/cask.json".to_string()
}

fn default_staleness_hours() -> u64 {
    48
}

fn default_batch_size() -> usize {
    500
}

fn default_timeout() -> u32 {
    60
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            sync: config.sync.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "brewdex.db");
        assert_eq!(config.sync.staleness_hours, 48);
        assert_eq!(config.sync.batch_size, 500);
        assert!(config.sync.formula_url.contains("formula.json"));
    }

    #[test]
    fn test_deserialize_custom_server() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_custom_sync_section() {
        let toml = r#"
[sync]
formula_url = "http://localhost:9999/formula.json"
cask_url = "http://localhost:9999/cask.json"
staleness_hours = 12
batch_size = 100
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sync.staleness_hours, 12);
        assert_eq!(config.sync.batch_size, 100);
        assert_eq!(config.sync.timeout_secs, 60); // default
        assert!(config.sync.formula_url.starts_with("http://localhost"));
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/my-db.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/my-db.sqlite");
    }

    #[test]
    fn test_sanitized_config() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.server.port, 8080);
        assert_eq!(sanitized.database.path.to_str().unwrap(), "brewdex.db");
        assert_eq!(sanitized.sync.batch_size, 500);
    }
}
