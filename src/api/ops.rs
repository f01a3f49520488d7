//! Cloud API abstraction for testability
//!
//! The backup pipeline talks to the API through this trait so tests can
//! drive it with a scripted mock instead of a live account.

use super::client::{ApiClient, ApiResult};
use super::types::{Action, BackupImage, Server};

/// Abstraction over the cloud API operations the pipeline uses
pub trait ApiOperations: Send + Sync {
    /// List all servers visible to the account
    fn list_servers(&self) -> ApiResult<Vec<Server>>;

    /// Trigger a temporary backup, returns the action id to poll
    fn trigger_backup(&self, server_id: i64) -> ApiResult<i64>;

    /// Fetch the current state of a long-running action
    fn get_action(&self, action_id: i64) -> ApiResult<Action>;

    /// List backup images for a server, oldest first
    fn list_backups(&self, server_id: i64) -> ApiResult<Vec<BackupImage>>;

    /// Resolve the compressed download URL for an image
    fn download_url(&self, image_id: i64) -> ApiResult<String>;

    /// Expected size of an image in gigabytes
    fn image_size_gigabytes(&self, image_id: i64) -> ApiResult<f64>;
}

impl ApiOperations for ApiClient {
    fn list_servers(&self) -> ApiResult<Vec<Server>> {
        ApiClient::list_servers(self)
    }

    fn trigger_backup(&self, server_id: i64) -> ApiResult<i64> {
        ApiClient::trigger_backup(self, server_id)
    }

    fn get_action(&self, action_id: i64) -> ApiResult<Action> {
        ApiClient::get_action(self, action_id)
    }

    fn list_backups(&self, server_id: i64) -> ApiResult<Vec<BackupImage>> {
        ApiClient::list_backups(self, server_id)
    }

    fn download_url(&self, image_id: i64) -> ApiResult<String> {
        ApiClient::download_url(self, image_id)
    }

    fn image_size_gigabytes(&self, image_id: i64) -> ApiResult<f64> {
        ApiClient::image_size_gigabytes(self, image_id)
    }
}

/// Mock implementation for testing
/// Available for use in external test crates
#[allow(dead_code)]
pub mod mock {
    use super::*;
    use crate::api::client::ApiError;
    use crate::api::types::ActionStatus;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    /// Recorded API call
    #[derive(Clone, Debug)]
    pub enum ApiCall {
        ListServers,
        TriggerBackup { server_id: i64 },
        GetAction { action_id: i64 },
        ListBackups { server_id: i64 },
        DownloadUrl { image_id: i64 },
        ImageSize { image_id: i64 },
    }

    /// Mock cloud API for testing
    ///
    /// `get_action` plays back the configured status sequence one entry
    /// per poll; the final entry repeats forever. An empty sequence
    /// reports every action as completed.
    #[derive(Clone, Default)]
    pub struct MockApi {
        /// Recorded calls in order
        pub calls: Arc<Mutex<Vec<ApiCall>>>,
        /// Servers returned by list_servers
        pub servers: Arc<Mutex<Vec<Server>>>,
        /// Backups per server id
        pub backups: Arc<Mutex<HashMap<i64, Vec<BackupImage>>>>,
        /// Scripted action states, drained per get_action call
        pub action_states: Arc<Mutex<VecDeque<(ActionStatus, Option<String>)>>>,
        /// Download URLs per image id
        pub download_urls: Arc<Mutex<HashMap<i64, String>>>,
        /// Image sizes (gigabytes) per image id
        pub image_sizes: Arc<Mutex<HashMap<i64, f64>>>,
        /// Whether list_servers should fail
        pub should_fail_list_servers: Arc<Mutex<bool>>,
        /// Whether get_action should fail
        pub should_fail_get_action: Arc<Mutex<bool>>,
        /// Server ids whose trigger call should fail
        pub failing_triggers: Arc<Mutex<Vec<i64>>>,
        /// Whether image metadata lookups should fail
        pub should_fail_image_size: Arc<Mutex<bool>>,
        /// Next action id handed out by trigger_backup
        pub next_action_id: Arc<Mutex<i64>>,
    }

    impl MockApi {
        pub fn new() -> Self {
            Self {
                next_action_id: Arc::new(Mutex::new(1000)),
                ..Default::default()
            }
        }

        /// Configure servers to return
        pub fn with_servers(self, servers: Vec<Server>) -> Self {
            *self.servers.lock().unwrap() = servers;
            self
        }

        /// Shorthand: servers from (id, name) pairs
        pub fn with_server_names(self, servers: &[(i64, &str)]) -> Self {
            let servers = servers
                .iter()
                .map(|(id, name)| Server {
                    id: *id,
                    name: name.to_string(),
                })
                .collect();
            self.with_servers(servers)
        }

        /// Configure the backup listing for a server
        pub fn with_backups(self, server_id: i64, image_ids: &[i64]) -> Self {
            let images = image_ids.iter().map(|id| BackupImage { id: *id }).collect();
            self.backups.lock().unwrap().insert(server_id, images);
            self
        }

        /// Configure the status sequence played back by get_action
        pub fn with_action_sequence(self, statuses: &[ActionStatus]) -> Self {
            let mut states = self.action_states.lock().unwrap();
            states.clear();
            states.extend(statuses.iter().map(|s| (*s, None)));
            drop(states);
            self
        }

        /// Configure get_action to report a failed action
        pub fn with_errored_action(self, message: &str) -> Self {
            self.action_states
                .lock()
                .unwrap()
                .push_back((ActionStatus::Errored, Some(message.to_string())));
            self
        }

        /// Configure the download URL for an image
        pub fn with_download_url(self, image_id: i64, url: &str) -> Self {
            self.download_urls
                .lock()
                .unwrap()
                .insert(image_id, url.to_string());
            self
        }

        /// Configure the metadata size for an image
        pub fn with_image_size(self, image_id: i64, gigabytes: f64) -> Self {
            self.image_sizes.lock().unwrap().insert(image_id, gigabytes);
            self
        }

        /// Configure list_servers to fail
        pub fn with_failing_list_servers(self) -> Self {
            *self.should_fail_list_servers.lock().unwrap() = true;
            self
        }

        /// Configure get_action to fail
        pub fn with_failing_get_action(self) -> Self {
            *self.should_fail_get_action.lock().unwrap() = true;
            self
        }

        /// Configure trigger_backup to fail for one server
        pub fn with_failing_trigger(self, server_id: i64) -> Self {
            self.failing_triggers.lock().unwrap().push(server_id);
            self
        }

        /// Configure image metadata lookups to fail
        pub fn with_failing_image_size(self) -> Self {
            *self.should_fail_image_size.lock().unwrap() = true;
            self
        }

        /// Get all recorded calls
        pub fn get_calls(&self) -> Vec<ApiCall> {
            self.calls.lock().unwrap().clone()
        }

        /// How many times get_action was polled
        pub fn poll_count(&self) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| matches!(c, ApiCall::GetAction { .. }))
                .count()
        }

        /// Check if a backup was triggered for a server
        pub fn trigger_called_for(&self, server_id: i64) -> bool {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .any(|c| matches!(c, ApiCall::TriggerBackup { server_id: id } if *id == server_id))
        }

        /// Check if a download URL was resolved for an image
        pub fn download_url_called_for(&self, image_id: i64) -> bool {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .any(|c| matches!(c, ApiCall::DownloadUrl { image_id: id } if *id == image_id))
        }

        fn record_call(&self, call: ApiCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn http_error(status: u16, detail: &str) -> ApiError {
            ApiError::Http {
                status,
                body: detail.to_string(),
            }
        }
    }

    impl ApiOperations for MockApi {
        fn list_servers(&self) -> ApiResult<Vec<Server>> {
            self.record_call(ApiCall::ListServers);
            if *self.should_fail_list_servers.lock().unwrap() {
                return Err(Self::http_error(500, "mock list_servers failure"));
            }
            Ok(self.servers.lock().unwrap().clone())
        }

        fn trigger_backup(&self, server_id: i64) -> ApiResult<i64> {
            self.record_call(ApiCall::TriggerBackup { server_id });
            if self.failing_triggers.lock().unwrap().contains(&server_id) {
                return Err(Self::http_error(500, "mock trigger failure"));
            }
            let mut next = self.next_action_id.lock().unwrap();
            *next += 1;
            Ok(*next)
        }

        fn get_action(&self, action_id: i64) -> ApiResult<Action> {
            self.record_call(ApiCall::GetAction { action_id });
            if *self.should_fail_get_action.lock().unwrap() {
                return Err(Self::http_error(500, "mock get_action failure"));
            }
            let mut states = self.action_states.lock().unwrap();
            let (status, error_message) = if states.len() > 1 {
                states.pop_front().unwrap()
            } else if let Some(last) = states.front() {
                last.clone()
            } else {
                (ActionStatus::Completed, None)
            };
            Ok(Action {
                id: action_id,
                status,
                error_message,
            })
        }

        fn list_backups(&self, server_id: i64) -> ApiResult<Vec<BackupImage>> {
            self.record_call(ApiCall::ListBackups { server_id });
            Ok(self
                .backups
                .lock()
                .unwrap()
                .get(&server_id)
                .cloned()
                .unwrap_or_default())
        }

        fn download_url(&self, image_id: i64) -> ApiResult<String> {
            self.record_call(ApiCall::DownloadUrl { image_id });
            self.download_urls
                .lock()
                .unwrap()
                .get(&image_id)
                .cloned()
                .ok_or(ApiError::MissingDownloadUrl { image_id })
        }

        fn image_size_gigabytes(&self, image_id: i64) -> ApiResult<f64> {
            self.record_call(ApiCall::ImageSize { image_id });
            if *self.should_fail_image_size.lock().unwrap() {
                return Err(Self::http_error(500, "mock image metadata failure"));
            }
            self.image_sizes
                .lock()
                .unwrap()
                .get(&image_id)
                .copied()
                .ok_or_else(|| Self::http_error(404, "no image size configured"))
        }
    }
}
