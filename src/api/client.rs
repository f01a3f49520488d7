//! Blocking HTTP client for the cloud API
//!
//! Thin typed wrappers over the REST endpoints the backup pipeline needs.
//! No retries here; the only caller that polls is the action waiter.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use super::types::{Action, BackupImage, Server};
use crate::config::GlobalConfig;
use crate::managers::notification::NotificationManager;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("API transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to decode API response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Image {image_id} has no downloadable disks")]
    MissingDownloadUrl { image_id: i64 },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Authenticated client for the cloud API
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
    notifier: Option<NotificationManager>,
}

impl ApiClient {
    /// Create a client from the global configuration. Alerts about
    /// failed requests go through the notifier when one is given.
    pub fn new(config: &GlobalConfig, notifier: Option<NotificationManager>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            notifier,
        })
    }

    /// List all servers visible to the account
    pub fn list_servers(&self) -> ApiResult<Vec<Server>> {
        let envelope: ServersEnvelope = self.get_json("servers")?;
        Ok(envelope.servers)
    }

    /// Ask the API to take a temporary backup of a server, replacing
    /// the oldest slot. Returns the action id to poll.
    pub fn trigger_backup(&self, server_id: i64) -> ApiResult<i64> {
        let request = TakeBackupRequest {
            action_type: "take_backup",
            backup_type: "temporary",
            replacement_strategy: "oldest",
        };
        let envelope: TriggerEnvelope =
            self.post_json(&format!("servers/{}/actions", server_id), &request)?;
        Ok(envelope.action.id)
    }

    /// Fetch the current state of a long-running action
    pub fn get_action(&self, action_id: i64) -> ApiResult<Action> {
        let envelope: ActionEnvelope = self.get_json(&format!("actions/{}", action_id))?;
        Ok(envelope.action)
    }

    /// List backup images for a server, oldest first
    pub fn list_backups(&self, server_id: i64) -> ApiResult<Vec<BackupImage>> {
        let envelope: BackupsEnvelope = self.get_json(&format!("servers/{}/backups", server_id))?;
        Ok(envelope.backups)
    }

    /// Resolve the compressed download URL for an image (first disk)
    pub fn download_url(&self, image_id: i64) -> ApiResult<String> {
        let envelope: LinkEnvelope = self.get_json(&format!("images/{}/download", image_id))?;
        envelope
            .link
            .disks
            .into_iter()
            .next()
            .map(|disk| disk.compressed_url)
            .ok_or_else(|| self.report(ApiError::MissingDownloadUrl { image_id }))
    }

    /// Expected size of an image in gigabytes, per its metadata
    pub fn image_size_gigabytes(&self, image_id: i64) -> ApiResult<f64> {
        let envelope: ImageEnvelope = self.get_json(&format!("images/{}", image_id))?;
        Ok(envelope.image.size_gigabytes)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| self.report(ApiError::Transport(e)))?;
        self.decode(response)
    }

    fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| self.report(ApiError::Transport(e)))?;
        self.decode(response)
    }

    fn decode<T: DeserializeOwned>(&self, response: reqwest::blocking::Response) -> ApiResult<T> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().unwrap_or_default();
            return Err(self.report(ApiError::Http { status, body }));
        }
        response.json().map_err(|e| self.report(ApiError::Decode(e)))
    }

    /// Log an API failure and push it to the notifier before it
    /// propagates to the caller
    fn report(&self, err: ApiError) -> ApiError {
        error!("{}", err);
        if let Some(ref notifier) = self.notifier {
            notifier.alert(&err.to_string());
        }
        err
    }
}

#[derive(Debug, Serialize)]
struct TakeBackupRequest {
    #[serde(rename = "type")]
    action_type: &'static str,
    backup_type: &'static str,
    replacement_strategy: &'static str,
}

#[derive(Debug, serde::Deserialize)]
struct ServersEnvelope {
    servers: Vec<Server>,
}

#[derive(Debug, serde::Deserialize)]
struct TriggerEnvelope {
    action: TriggeredAction,
}

#[derive(Debug, serde::Deserialize)]
struct TriggeredAction {
    id: i64,
}

#[derive(Debug, serde::Deserialize)]
struct ActionEnvelope {
    action: Action,
}

#[derive(Debug, serde::Deserialize)]
struct BackupsEnvelope {
    backups: Vec<BackupImage>,
}

#[derive(Debug, serde::Deserialize)]
struct LinkEnvelope {
    link: DownloadLink,
}

#[derive(Debug, serde::Deserialize)]
struct DownloadLink {
    disks: Vec<DiskLink>,
}

#[derive(Debug, serde::Deserialize)]
struct DiskLink {
    compressed_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct ImageEnvelope {
    image: ImageMeta,
}

#[derive(Debug, serde::Deserialize)]
struct ImageMeta {
    size_gigabytes: f64,
}
