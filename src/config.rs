//! Runtime settings resolved from `MATHML_PARSER_*` environment variables.
//!
//! Command line flags are applied on top by the binary, so the precedence is
//! flag, then environment, then the built-in default.

use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::api::SecurityConfig;

pub const ENV_DATABASE: &str = "MATHML_PARSER_DATABASE";
pub const ENV_HOST: &str = "MATHML_PARSER_HOST";
pub const ENV_PORT: &str = "MATHML_PARSER_PORT";
pub const ENV_SEED: &str = "MATHML_PARSER_SEED";
pub const ENV_API_KEY: &str = "MATHML_PARSER_API_KEY";
pub const ENV_CORS_ORIGINS: &str = "MATHML_PARSER_CORS_ORIGINS";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be an IP address, got {value:?}")]
    InvalidHost { var: &'static str, value: String },

    #[error("{var} must be true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Database file. `None` means the platform data directory.
    pub database: Option<PathBuf>,
    pub host: IpAddr,
    pub port: u16,
    /// Insert demonstration data into an empty store on startup.
    pub seed: bool,
    pub security: SecurityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            seed: true,
            security: SecurityConfig::disabled(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let lookup = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup(ENV_DATABASE) {
            config.database = Some(PathBuf::from(path));
        }
        if let Some(host) = lookup(ENV_HOST) {
            config.host = host.trim().parse().map_err(|_| ConfigError::InvalidHost {
                var: ENV_HOST,
                value: host.clone(),
            })?;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            config.seed = parse_flag(ENV_SEED, &seed)?;
        }

        config.security.api_key = lookup(ENV_API_KEY);
        config.security.cors_origins = lookup(ENV_CORS_ORIGINS).map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(config)
    }

    /// Database path, falling back to the platform data directory.
    pub fn database_path(&self) -> crate::db::DbResult<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => crate::db::default_path(),
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config_from(&[]).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.host.to_string(), DEFAULT_HOST);
        assert_eq!(config.port, 5000);
        assert!(config.seed);
        assert!(config.security.api_key.is_none());
        assert!(config.security.cors_origins.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (ENV_DATABASE, "/tmp/calc.db"),
            (ENV_HOST, "0.0.0.0"),
            (ENV_PORT, "8080"),
            (ENV_SEED, "off"),
            (ENV_API_KEY, "secret"),
            (ENV_CORS_ORIGINS, "http://a.test, http://b.test,"),
        ])
        .unwrap();

        assert_eq!(config.database, Some(PathBuf::from("/tmp/calc.db")));
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.seed);
        assert_eq!(config.security.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.security.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = config_from(&[(ENV_PORT, "  "), (ENV_API_KEY, "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.security.api_key.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            config_from(&[(ENV_PORT, "eighty")]),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            config_from(&[(ENV_HOST, "localhost:5000")]),
            Err(ConfigError::InvalidHost { .. })
        ));
        assert!(matches!(
            config_from(&[(ENV_SEED, "maybe")]),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn explicit_database_path_wins_over_data_dir() {
        let config = config_from(&[(ENV_DATABASE, "store.db")]).unwrap();
        assert_eq!(config.database_path().unwrap(), PathBuf::from("store.db"));
    }
}
