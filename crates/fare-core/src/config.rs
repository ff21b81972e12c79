//! Configuration management
//!
//! Settings are resolved in the following order:
//! 1. Environment variables
//! 2. fare-gateway.toml configuration file
//! 3. Default values

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ServiceKind;
use crate::{Error, Result};

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port for the HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Whether scraping sessions run headless
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Custom user agent for scraping sessions
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            user_agent: None,
        }
    }
}

fn default_headless() -> bool {
    true
}

/// Credential store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "fare-gateway.db".to_string()
}

/// Main configuration for fare-gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Browser settings
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Credential store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Services enabled for comparison, in configuration order
    #[serde(default = "default_services")]
    pub services: Vec<ServiceKind>,
}

fn default_services() -> Vec<ServiceKind> {
    ServiceKind::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            browser: BrowserSettings::default(),
            store: StoreConfig::default(),
            services: default_services(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }

    /// Load configuration with the standard precedence.
    ///
    /// Reads `FARE_CONFIG` (or `fare-gateway.toml` when present), then
    /// applies environment variable overrides on top.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("FARE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let default_path = "fare-gateway.toml";
                if Path::new(default_path).exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(port) = std::env::var("API_PORT") {
            config.api.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid API_PORT: {}", port)))?;
        }
        if let Ok(headless) = std::env::var("BROWSER_HEADLESS") {
            config.browser.headless = matches!(headless.as_str(), "1" | "true" | "yes");
        }
        if let Ok(agent) = std::env::var("BROWSER_USER_AGENT") {
            if !agent.is_empty() {
                config.browser.user_agent = Some(agent);
            }
        }
        if let Ok(path) = std::env::var("FARE_DB_PATH") {
            if !path.is_empty() {
                config.store.db_path = path;
            }
        }
        if let Ok(list) = std::env::var("FARE_SERVICES") {
            config.services = parse_service_list(&list)?;
        }

        if config.services.is_empty() {
            return Err(Error::Config("no services enabled".to_string()));
        }

        Ok(config)
    }
}

/// Parse a comma-separated service list, preserving order
fn parse_service_list(list: &str) -> Result<Vec<ServiceKind>> {
    let mut services = Vec::new();
    for name in list.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let kind = ServiceKind::from_str(name)?;
        if !services.contains(&kind) {
            services.push(kind);
        }
    }
    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 3000);
        assert!(config.browser.headless);
        assert_eq!(config.store.db_path, "fare-gateway.db");
        assert_eq!(config.services, ServiceKind::ALL.to_vec());

        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.services, ServiceKind::ALL.to_vec());
    }

    #[test]
    fn test_from_toml() {
        let config: Config = toml::from_str(
            r#"
            services = ["rapido", "uber"]

            [api]
            port = 8080

            [browser]
            headless = false
            user_agent = "FareBot/1.0"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.port, 8080);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.user_agent.as_deref(), Some("FareBot/1.0"));
        assert_eq!(
            config.services,
            vec![ServiceKind::Rapido, ServiceKind::Uber]
        );
    }

    #[test]
    fn test_parse_service_list() {
        let services = parse_service_list("uber, ola,uber").unwrap();
        assert_eq!(services, vec![ServiceKind::Uber, ServiceKind::Ola]);
        assert!(parse_service_list("uber,teleport").is_err());
    }
}
