use super::types::*;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate the configuration
fn validate_config(config: &Config) -> Result<()> {
    let global = &config.global;

    if global.api_base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "api_base_url must be set".to_string(),
        ));
    }

    if !global.api_base_url.starts_with("http://") && !global.api_base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "api_base_url must be an http(s) URL: {}",
            global.api_base_url
        )));
    }

    if global.api_token.is_empty() {
        return Err(ConfigError::ValidationError(
            "api_token must be set".to_string(),
        ));
    }

    if global.backup_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "backup_dir must be set".to_string(),
        ));
    }

    if global.retention_days == 0 {
        return Err(ConfigError::ValidationError(
            "retention_days must be at least 1".to_string(),
        ));
    }

    if !config.notifications.webhook_url.is_empty()
        && !config.notifications.webhook_url.starts_with("http")
    {
        return Err(ConfigError::ValidationError(format!(
            "notifications.webhook_url must be an http(s) URL: {}",
            config.notifications.webhook_url
        )));
    }

    Ok(())
}
