use crate::error::{LookupError, Result};
use serde::Deserialize;
use std::fs;

/// Published location of the positive list. Skat rotates the media path when
/// a new edition goes out; override it in config.toml without rebuilding.
pub const DEFAULT_LIST_URL: &str =
    "https://skat.dk/media/btpf4wfr/februar-2026-abis-liste-2021-2026.xlsx";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_url() -> String {
    DEFAULT_LIST_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: default_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory. A missing file is not an
    /// error; the built-in defaults point at the current published list.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no {} found, using defaults", config_path);
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(LookupError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path, e
                )))
            }
        };

        let config: Config = toml::from_str(&config_content)
            .map_err(|e| LookupError::Config(format!("Failed to parse '{}': {}", config_path, e)))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_published_list() {
        let config = Config::default();
        assert!(config.source.url.ends_with(".xlsx"));
        assert_eq!(config.source.timeout_seconds, 30);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str("[source]\nurl = \"https://example.test/liste.xlsx\"\n")
            .unwrap();
        assert_eq!(config.source.url, "https://example.test/liste.xlsx");
        assert_eq!(config.source.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }
}
