use serde::{Deserialize, Serialize};

/// A remote virtual server eligible for backup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
}

/// Status of a remote long-running action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Still running; the API also reports this as "in-progress"
    #[serde(alias = "in-progress")]
    Pending,
    Completed,
    Errored,
}

/// A remote asynchronous operation, observed by polling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Action {
    #[serde(default)]
    pub id: i64,
    pub status: ActionStatus,
    /// Failure detail; older API revisions report it as `result_data`
    #[serde(default, alias = "result_data")]
    pub error_message: Option<String>,
}

/// A completed backup image as listed by the backups endpoint.
/// The listing is ordered oldest first, so the last entry is the
/// most recent backup. Size metadata lives on the image endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupImage {
    pub id: i64,
}
