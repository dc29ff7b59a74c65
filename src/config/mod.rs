//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod storage;

pub use storage::{PostgresConfig, SqliteConfig, StorageConfig, StorageType};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "PAYSTREAM_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "PAYSTREAM";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "PAYSTREAM_LOG";

use serde::Deserialize;

use crate::dashboard::DashboardConfig;
use crate::ingest::IngestConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Generator/ingestor configuration.
    pub ingest: IngestConfig,
    /// Dashboard/reader configuration.
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ::config::ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from a YAML document, without consulting the environment.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        let mut config = Self::default();
        config.storage.sqlite.path = ":memory:".to_string();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::WriteErrorPolicy;
    use serial_test::serial;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.storage.storage_type, StorageType::Sqlite);
        assert_eq!(config.ingest.user_id, "User_1");
        assert_eq!(config.ingest.interval_ms, 1000);
        assert_eq!(config.ingest.on_write_error, WriteErrorPolicy::LogAndContinue);
        assert!(!config.ingest.reset_schema);
        assert_eq!(config.dashboard.feed_limit, 10);
        assert_eq!(config.dashboard.refresh_ms, 1000);
    }

    #[test]
    fn test_config_for_test() {
        let config = Config::for_test();
        assert_eq!(config.storage.sqlite.path, ":memory:");
    }

    #[test]
    fn test_from_yaml_partial_sections() {
        let yaml = r#"
storage:
  type: postgres
  postgres:
    uri: postgres://db:5432/payments
ingest:
  interval_ms: 250
  on_write_error: fail_fast
  max_transactions: 5
dashboard:
  feed_limit: 50
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.storage.storage_type, StorageType::Postgres);
        assert_eq!(config.storage.postgres.uri, "postgres://db:5432/payments");
        assert_eq!(config.ingest.interval_ms, 250);
        assert_eq!(config.ingest.on_write_error, WriteErrorPolicy::FailFast);
        assert_eq!(config.ingest.max_transactions, Some(5));
        assert_eq!(config.ingest.templates_path, "data/transactions.csv");
        assert_eq!(config.dashboard.feed_limit, 50);
        assert_eq!(config.dashboard.top_merchants, 10);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_policy() {
        let yaml = "ingest:\n  on_write_error: retry_forever\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    #[serial]
    fn test_load_env_override() {
        std::env::set_var("PAYSTREAM__DASHBOARD__FEED_LIMIT", "25");
        std::env::set_var("PAYSTREAM__INGEST__USER_ID", "User_9");
        let config = Config::load(None);
        std::env::remove_var("PAYSTREAM__DASHBOARD__FEED_LIMIT");
        std::env::remove_var("PAYSTREAM__INGEST__USER_ID");

        let config = config.unwrap();
        assert_eq!(config.dashboard.feed_limit, 25);
        assert_eq!(config.ingest.user_id, "User_9");
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_file_fails() {
        assert!(Config::load(Some("does/not/exist.yaml")).is_err());
    }
}
