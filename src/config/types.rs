use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Base URL of the cloud API, e.g. "https://api.example-cloud.net/v2"
    pub api_base_url: String,

    /// Bearer token for the cloud API
    pub api_token: String,

    /// Directory that receives downloaded backup images
    pub backup_dir: PathBuf,

    /// Days to keep local backup files before rotation removes them
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// How long to wait for a remote backup action to finish
    #[serde(default = "default_action_timeout")]
    pub action_timeout_seconds: u64,

    /// Overall timeout for a single image download
    #[serde(default = "default_download_timeout")]
    pub download_timeout_seconds: u64,

    /// Logging configuration
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
}

/// Notification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Webhook endpoint for alerts; empty disables notifications
    #[serde(default)]
    pub webhook_url: String,

    /// Master switch, useful for muting alerts without losing the URL
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            enabled: default_enabled(),
        }
    }
}

impl NotificationConfig {
    /// Whether alerts should actually be sent
    pub fn is_active(&self) -> bool {
        self.enabled && !self.webhook_url.is_empty()
    }
}

// Default value functions

fn default_retention_days() -> u32 { 14 }
fn default_action_timeout() -> u64 { 3600 }
fn default_download_timeout() -> u64 { 3600 }
fn default_log_directory() -> PathBuf { PathBuf::from("~/logs") }
fn default_log_level() -> String { "info".to_string() }
fn default_log_max_files() -> u32 { 10 }
fn default_enabled() -> bool { true }
