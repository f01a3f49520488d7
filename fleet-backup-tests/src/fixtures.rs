//! Test fixtures and sample data

use chrono::Local;
use fleet_backup::api::Server;
use std::path::{Path, PathBuf};

/// Create a server with the given id and name
pub fn server(id: i64, name: &str) -> Server {
    Server {
        id,
        name: name.to_string(),
    }
}

/// The two-server fleet used by most pipeline tests
pub fn sample_fleet() -> Vec<Server> {
    vec![server(101, "web-01"), server(202, "db-01")]
}

/// Artifact file name dated `days_ago` days in the past
pub fn artifact_name_days_ago(days_ago: i64) -> String {
    let date = Local::now().date_naive() - chrono::Duration::days(days_ago);
    format!("backup-{}-020000.tar.gz", date.format("%Y-%m-%d"))
}

/// Write a small artifact file, creating the directory if needed
pub fn write_artifact(server_dir: &Path, name: &str) -> PathBuf {
    std::fs::create_dir_all(server_dir).expect("Failed to create server dir");
    let path = server_dir.join(name);
    std::fs::write(&path, b"image bytes").expect("Failed to write artifact");
    path
}

/// Minimal valid config TOML template
pub fn minimal_config_toml() -> &'static str {
    r#"
[global]
api_base_url = "https://api.example-cloud.net/v2"
api_token = "test-token"
backup_dir = "{backup_dir}"
log_directory = "{log_dir}"
"#
}

/// Config TOML template with notifications enabled
pub fn config_with_webhook_toml() -> &'static str {
    r#"
[global]
api_base_url = "https://api.example-cloud.net/v2"
api_token = "test-token"
backup_dir = "{backup_dir}"
retention_days = 7
log_directory = "{log_dir}"

[notifications]
webhook_url = "https://hooks.example.net/alerts"
enabled = true
"#
}
