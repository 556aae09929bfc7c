//! Configuration management for the bnc client

use bnc_types::Network;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the configuration file inside the home directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// How the command-line tool prints results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "output".to_string(),
                reason: format!("expected text or json, got {other:?}"),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Public API endpoint of `network`
pub fn default_api_url(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "https://dex.binance.org",
        Network::Testnet => "https://testnet-dex.binance.org",
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Network transactions are built for
    pub network: Network,
    /// Base URL of the HTTP API
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Output format (text, json)
    pub output: OutputFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            api_url: default_api_url(Network::default()).to_string(),
            timeout: 30,
            output: OutputFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get default configuration directory
    pub fn default_config_dir() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(".bnc")
        } else {
            PathBuf::from(".bnc")
        }
    }

    /// Configuration file inside `dir`, or inside the default directory
    pub fn config_file(dir: Option<&Path>) -> PathBuf {
        match dir {
            Some(dir) => dir.join(CONFIG_FILE_NAME),
            None => Self::default_config_dir().join(CONFIG_FILE_NAME),
        }
    }

    /// Load the configuration in `dir`, or the defaults when there is none
    pub fn load_or_default(dir: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = Self::config_file(dir);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Initialize configuration directory and file
    pub fn init(dir: Option<&Path>, overwrite: bool) -> Result<Self, ConfigError> {
        let config_file = Self::config_file(dir);

        if let Some(config_dir) = config_file.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
            }
        }

        if config_file.exists() && !overwrite {
            return Self::load_from_file(config_file);
        }

        let config = Self::default();
        config.save_to_file(config_file)?;
        Ok(config)
    }

    /// Set a configuration value
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "network" => {
                self.network = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("expected mainnet or testnet, got {value:?}"),
                })?;
            }
            "api_url" => {
                url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;
                self.api_url = value.to_string();
            }
            "timeout" => {
                self.timeout = match value.parse() {
                    Ok(secs) if secs > 0 => secs,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            reason: format!("expected a positive number of seconds, got {value:?}"),
                        })
                    }
                };
            }
            "output" => self.output = value.parse()?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.api_url, "https://dex.binance.org");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let original_config = ClientConfig {
            network: Network::Testnet,
            api_url: "http://localhost:8080".to_string(),
            timeout: 60,
            output: OutputFormat::Json,
        };

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = ClientConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config, original_config);

        let text = std::fs::read_to_string(&config_path).unwrap();
        assert!(text.contains("network = \"testnet\""));
    }

    #[test]
    fn test_init_and_load_or_default() {
        let temp_dir = tempdir().unwrap();
        let home = temp_dir.path().join("home");

        assert_eq!(
            ClientConfig::load_or_default(Some(&home)).unwrap(),
            ClientConfig::default()
        );

        let mut config = ClientConfig::init(Some(&home), false).unwrap();
        assert!(home.join(CONFIG_FILE_NAME).exists());

        config.set("network", "testnet").unwrap();
        config
            .save_to_file(ClientConfig::config_file(Some(&home)))
            .unwrap();

        // An existing file is kept unless overwrite is requested.
        let kept = ClientConfig::init(Some(&home), false).unwrap();
        assert_eq!(kept.network, Network::Testnet);
        let reset = ClientConfig::init(Some(&home), true).unwrap();
        assert_eq!(reset.network, Network::Mainnet);
    }

    #[test]
    fn test_set_config_values() {
        let mut config = ClientConfig::default();

        config.set("network", "testnet").unwrap();
        assert_eq!(config.network, Network::Testnet);

        config.set("api_url", "http://localhost:8080").unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");

        config.set("timeout", "60").unwrap();
        assert_eq!(config.timeout, 60);

        config.set("output", "json").unwrap();
        assert_eq!(config.output, OutputFormat::Json);

        assert!(matches!(
            config.set("invalid_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(config.set("network", "devnet").is_err());
        assert!(config.set("timeout", "invalid").is_err());
        assert!(config.set("timeout", "0").is_err());
        assert!(config.set("api_url", "not a url").is_err());
        assert!(config.set("output", "yaml").is_err());
        assert_eq!(config.network, Network::Testnet);
    }
}
