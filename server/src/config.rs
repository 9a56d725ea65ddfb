use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Built-in defaults, compiled into the binary
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Prefix for structured environment overrides, e.g. `TASKHUB_DATABASE__URL`
const ENV_PREFIX: &str = "TASKHUB";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite URL (`sqlite://path` or `sqlite::memory:`)
    pub url: String,
    /// Maximum number of database connections in the pool
    pub max_connections: u32,
    /// How long to wait for a pooled connection, in seconds
    pub acquire_timeout_secs: u64,
    /// Startup connection attempts before giving up
    pub connect_retries: u32,
    /// Delay between startup connection attempts, in seconds
    pub retry_delay_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address for the HTTP server
    pub listen_addr: String,
    /// Port number to listen on
    pub port: u16,
    /// Upper bound for a whole HTTP request, in seconds
    pub request_timeout_secs: u64,
    /// Upper bound for a single store call, in seconds; 0 disables it
    pub operation_timeout_secs: u64,
    /// Deployment label, reported in startup logs
    pub environment: String,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Command-line overrides, applied last
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_url: Option<String>,
    pub listen_addr: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration: embedded defaults, then the optional file, then
    /// `TASKHUB_*` variables, then the standard variables
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let mut config = Self::from_sources(config_file)?;
        config.apply_standard_env_vars(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Layered sources only: embedded defaults, file, `TASKHUB_*` variables
    pub fn from_sources(config_file: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Apply the conventional deployment variables (DATABASE_URL, PORT, LOG_LEVEL, ENVIRONMENT)
    pub fn apply_standard_env_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database_url) = lookup("DATABASE_URL") {
            self.database.url = database_url;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.logging.level = log_level;
        }

        if let Some(environment) = lookup("ENVIRONMENT") {
            self.server.environment = environment;
        }

        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(listen_addr) = overrides.listen_addr {
            self.server.listen_addr = listen_addr;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    /// Get the server socket address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.listen_addr, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Per-operation store deadline, `None` when disabled
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.server.operation_timeout_secs > 0)
            .then(|| Duration::from_secs(self.server.operation_timeout_secs))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "Only SQLite databases are supported. URL must start with 'sqlite:'. Got: {}",
                self.database.url
            ));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Server request_timeout_secs must be greater than 0"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!(
                "Database max_connections must be greater than 0"
            ));
        }

        if self.database.connect_retries == 0 {
            return Err(anyhow::anyhow!(
                "Database connect_retries must be greater than 0"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://taskhub.db".to_string(),
                max_connections: 10,
                acquire_timeout_secs: 5,
                connect_retries: 10,
                retry_delay_secs: 2,
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_secs: 30,
                operation_timeout_secs: 10,
                environment: "development".to_string(),
                allowed_origins: vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:3000".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_server_address() {
        let config = Config::default();
        assert_eq!(config.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let mut invalid = Config::default();
        invalid.logging.level = "invalid".to_string();
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.database.url = "postgres://localhost/tasks".to_string();
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.server.port = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = Config::default();
        invalid.database.max_connections = 0;
        assert!(invalid.validate().is_err());

        let mut memory = Config::default();
        memory.database.url = "sqlite::memory:".to_string();
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn test_standard_env_vars() {
        let mut config = Config::default();
        config
            .apply_standard_env_vars(lookup(&[
                ("DATABASE_URL", "sqlite://other.db"),
                ("PORT", "9090"),
                ("LOG_LEVEL", "debug"),
                ("ENVIRONMENT", "production"),
            ]))
            .unwrap();

        assert_eq!(config.database.url, "sqlite://other.db");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.environment, "production");
    }

    #[test]
    fn test_invalid_port_env_var() {
        let mut config = Config::default();
        let result = config.apply_standard_env_vars(lookup(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        config.apply_overrides(CliOverrides {
            port: Some(4000),
            log_level: Some("warn".to_string()),
            ..Default::default()
        });
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.database.url, "sqlite://taskhub.db");
    }

    #[test]
    fn test_operation_timeout_zero_disables() {
        let mut config = Config::default();
        assert_eq!(config.operation_timeout(), Some(Duration::from_secs(10)));
        config.server.operation_timeout_secs = 0;
        assert_eq!(config.operation_timeout(), None);
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 7070\nallowed_origins = [\"https://tasks.example\"]\n\n\
             [logging]\nformat = \"json\""
        )
        .unwrap();

        let config = Config::from_sources(file.path().to_str()).unwrap();
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.allowed_origins, vec!["https://tasks.example"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        // Untouched keys keep their defaults
        assert_eq!(config.database.connect_retries, 10);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(Config::from_sources(Some("/nonexistent/taskhub.toml")).is_err());
    }
}
