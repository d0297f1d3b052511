//! Configuration settings management
//!
//! This module handles loading configuration from multiple sources,
//! validation, and the defaults applied to provisioning requests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{GroundworkError, Result};

fn display_option(opt: &Option<String>) -> String {
    match opt {
        Some(value) => value.clone(),
        None => "-".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct Config {
    #[tabled(rename = "Debug")]
    pub debug: bool,
    #[tabled(rename = "Subscription ID")]
    pub subscription_id: String,
    #[tabled(skip)]
    pub tenant_id: String,
    #[tabled(skip)]
    pub client_id: Option<String>,
    #[tabled(skip)]
    pub client_secret: Option<String>,
    #[tabled(rename = "Default Resource Group")]
    pub default_resource_group: String,
    #[tabled(rename = "Default Location")]
    pub default_location: String,
    #[tabled(rename = "Account Prefix")]
    pub default_account_prefix: String,
    #[tabled(rename = "Default Kind", display_with = "display_option")]
    pub default_kind: Option<String>,
    #[tabled(rename = "Default SKU", display_with = "display_option")]
    pub default_sku: Option<String>,
    #[tabled(rename = "Poll Interval (s)")]
    pub poll_interval_secs: u64,
    #[tabled(rename = "JSON Output")]
    pub output_json: bool,
    #[tabled(rename = "No Color")]
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            subscription_id: String::new(),
            tenant_id: String::new(),
            client_id: None,
            client_secret: None,
            default_resource_group: "sample-resource-group".to_string(),
            default_location: "westus".to_string(),
            default_account_prefix: "samplestor".to_string(),
            default_kind: None,
            default_sku: None,
            poll_interval_secs: 5,
            output_json: false,
            no_color: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.subscription_id.is_empty() {
            return Err(GroundworkError::config("Subscription ID is required"));
        }

        if self.client_id.is_some() != self.client_secret.is_some() {
            return Err(GroundworkError::config(
                "Service principal authentication requires both client_id and client_secret",
            ));
        }

        if self.client_id.is_some() && self.tenant_id.is_empty() {
            return Err(GroundworkError::config(
                "Tenant ID is required for service principal authentication",
            ));
        }

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        // Use XDG Base Directory specification on Linux and macOS
        // On Windows, use the platform-appropriate config directory
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| GroundworkError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("gw").join("gw.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| GroundworkError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("gw").join("gw.toml"))
        }
    }
}

/// Load configuration from file and environment, then validate it
pub async fn load_config() -> Result<Config> {
    let config = load_config_unvalidated().await?;
    config.validate()?;
    Ok(config)
}

/// Load configuration without validation, for commands that inspect it
pub async fn load_config_unvalidated() -> Result<Config> {
    let mut config = Config::default();

    let config_path = Config::get_config_path()?;
    if config_path.exists() {
        config = load_from_file(&config_path).await?;
    }

    load_from_env(&mut config);

    Ok(config)
}

async fn load_from_file(path: &PathBuf) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;

    // Try to parse as TOML first, then JSON as fallback
    if let Ok(config) = toml::from_str::<Config>(&contents) {
        return Ok(config);
    }

    let config = serde_json::from_str::<Config>(&contents)?;
    Ok(config)
}

fn load_from_env(config: &mut Config) {
    if let Ok(value) = std::env::var("DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Ok(value) = std::env::var("AZURE_SUBSCRIPTION_ID") {
        config.subscription_id = value;
    }

    if let Ok(value) = std::env::var("AZURE_TENANT_ID") {
        config.tenant_id = value;
    }

    if let Ok(value) = std::env::var("AZURE_CLIENT_ID") {
        config.client_id = Some(value);
    }

    if let Ok(value) = std::env::var("AZURE_CLIENT_SECRET") {
        config.client_secret = Some(value);
    }

    if let Ok(value) = std::env::var("GROUNDWORK_RESOURCE_GROUP") {
        config.default_resource_group = value;
    }

    if let Ok(value) = std::env::var("GROUNDWORK_LOCATION") {
        config.default_location = value;
    }

    if let Ok(value) = std::env::var("GROUNDWORK_ACCOUNT_PREFIX") {
        config.default_account_prefix = value;
    }

    if let Ok(value) = std::env::var("GROUNDWORK_POLL_INTERVAL") {
        if let Ok(seconds) = value.parse::<u64>() {
            config.poll_interval_secs = seconds;
        }
    }
}
