//! Server configuration
//!
//! Values come from, in order of precedence: command line flags, `SALESCAST_*`
//! environment variables, an optional TOML file, and built-in defaults.

use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "models/sales_gbdt.json";

pub const ENV_HOST: &str = "SALESCAST_HOST";
pub const ENV_PORT: &str = "SALESCAST_PORT";
pub const ENV_MODEL_PATH: &str = "SALESCAST_MODEL_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Parser, Debug, Default)]
#[command(name = "salescast-web")]
#[command(about = "Item-outlet sales prediction web service")]
#[command(version)]
pub struct Cli {
    /// Bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the model artifact
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Keys accepted in the TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    model_path: Option<PathBuf>,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ServerConfig {
    /// Merge CLI, environment (through `env`), file and defaults
    pub fn resolve<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let env_port = match lookup(ENV_PORT) {
            Some(value) => Some(value.trim().parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue {
                    key: ENV_PORT,
                    value,
                }
            })?),
            None => None,
        };

        let defaults = Self::default();
        Ok(Self {
            host: cli
                .host
                .clone()
                .or_else(|| lookup(ENV_HOST))
                .or(file.host)
                .unwrap_or(defaults.host),
            port: cli.port.or(env_port).or(file.port).unwrap_or(defaults.port),
            model_path: cli
                .model
                .clone()
                .or_else(|| lookup(ENV_MODEL_PATH).map(PathBuf::from))
                .or(file.model_path)
                .unwrap_or(defaults.model_path),
        })
    }

    /// Resolve against the process environment
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salescast.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_input() {
        let config = ServerConfig::resolve(&Cli::default(), no_env).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn precedence_is_cli_env_file() {
        let (_dir, path) = write_config("host = \"127.0.0.1\"\nport = 7000\nmodel_path = \"file.json\"\n");
        let env: HashMap<&str, &str> = [(ENV_PORT, "8000"), (ENV_MODEL_PATH, "env.json")].into();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let cli = Cli {
            model: Some(PathBuf::from("cli.json")),
            config: Some(path),
            ..Cli::default()
        };
        let config = ServerConfig::resolve(&cli, lookup).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, PathBuf::from("cli.json"));
    }

    #[test]
    fn invalid_env_port_is_rejected() {
        let err = ServerConfig::resolve(&Cli::default(), |key| {
            (key == ENV_PORT).then(|| "eighty".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_PORT, .. }));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config =
            ServerConfig::resolve(&Cli::default(), |_| Some("  ".to_string())).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, path) = write_config("port = \"not a number\"");
        let cli = Cli {
            config: Some(path),
            ..Cli::default()
        };
        assert!(matches!(
            ServerConfig::resolve(&cli, no_env),
            Err(ConfigError::Parse { .. })
        ));

        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/salescast.toml")),
            ..Cli::default()
        };
        assert!(matches!(
            ServerConfig::resolve(&cli, no_env),
            Err(ConfigError::Io { .. })
        ));
    }
}
