//! Test configuration builder
//!
//! Each built `Config` points at a fresh temp tree with the backup and
//! log directories already in place. Defaults keep timeouts short so
//! polling paths finish quickly under test.

use fleet_backup::config::{Config, GlobalConfig, NotificationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Assembles a `Config` rooted in its own temp directory.
pub struct ConfigBuilder {
    temp_dir: TempDir,
    global: GlobalConfig,
    notifications: NotificationConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir for test config");
        let backup_dir = temp_dir.path().join("backups");
        let log_directory = temp_dir.path().join("logs");
        for dir in [&backup_dir, &log_directory] {
            fs::create_dir_all(dir).expect("create config dirs");
        }

        let global = GlobalConfig {
            api_base_url: "https://api.example-cloud.net/v2".to_string(),
            api_token: "test-token".to_string(),
            backup_dir,
            retention_days: 14,
            action_timeout_seconds: 60,
            download_timeout_seconds: 60,
            log_directory,
            log_level: "info".to_string(),
            log_max_files: 3,
        };

        Self {
            temp_dir,
            global,
            notifications: NotificationConfig::default(),
        }
    }

    /// Shrink or widen the retention window.
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.global.retention_days = days;
        self
    }

    /// Cap how long action polling may run.
    pub fn with_action_timeout(mut self, seconds: u64) -> Self {
        self.global.action_timeout_seconds = seconds;
        self
    }

    /// Point notifications at a webhook and switch them on.
    pub fn with_webhook(mut self, url: &str) -> Self {
        self.notifications.webhook_url = url.to_string();
        self.notifications.enabled = true;
        self
    }

    /// Mute notifications without clearing the webhook URL.
    pub fn with_notifications_disabled(mut self) -> Self {
        self.notifications.enabled = false;
        self
    }

    /// Root of the builder's temp tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The backup directory inside the temp tree.
    pub fn backup_dir(&self) -> PathBuf {
        self.global.backup_dir.clone()
    }

    /// Finish building; the scratch directories are removed with the
    /// builder.
    pub fn build(self) -> Config {
        self.persist().0
    }

    /// Finish building and hand over the temp dir so the directories
    /// outlive the builder.
    pub fn persist(self) -> (Config, TempDir) {
        let Self {
            temp_dir,
            global,
            notifications,
        } = self;
        let config = Config {
            global,
            notifications,
        };
        (config, temp_dir)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
