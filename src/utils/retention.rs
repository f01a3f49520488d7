//! Local artifact rotation
//!
//! Deletes backup files whose filename-encoded date is older than the
//! retention window. Age comes from the name, never from filesystem
//! mtime: a re-downloaded copy of an old backup still counts as old.

use anyhow::Result;
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::naming::parse_artifact_name;

/// A locally stored artifact discovered by directory listing
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// Applies the retention window to per-server artifact directories
pub struct RetentionManager {
    retention_days: u32,
}

impl RetentionManager {
    pub fn new(retention_days: u32) -> Self {
        Self { retention_days }
    }

    /// Delete expired artifacts for one server. A missing directory is
    /// a no-op. Returns the deleted paths.
    pub fn rotate(&self, server_name: &str, target_dir: &Path) -> Result<Vec<PathBuf>> {
        let server_dir = target_dir.join(server_name);
        let expired = self.expired(&server_dir)?;

        let mut deleted = Vec::new();
        for artifact in expired {
            match fs::remove_file(&artifact.path) {
                Ok(()) => {
                    info!("Rotated out {:?} (dated {})", artifact.path, artifact.date);
                    deleted.push(artifact.path);
                }
                Err(e) => {
                    warn!("Failed to delete expired artifact {:?}: {}", artifact.path, e)
                }
            }
        }
        Ok(deleted)
    }

    /// List artifacts in `server_dir` that are past the retention window
    pub fn expired(&self, server_dir: &Path) -> Result<Vec<StoredArtifact>> {
        let now = Local::now();
        Ok(list_artifacts(server_dir)?
            .into_iter()
            .filter(|artifact| self.is_expired(artifact.date, &now))
            .collect())
    }

    /// Whether an artifact dated `date` is past the window at `now`.
    /// Date-only granularity: ages are measured from midnight local
    /// time on the encoded date, so the time part of a name never
    /// affects the verdict.
    fn is_expired(&self, date: NaiveDate, now: &DateTime<Local>) -> bool {
        let midnight = match Local.from_local_datetime(&date.and_time(NaiveTime::MIN)) {
            LocalResult::Single(t) => t,
            LocalResult::Ambiguous(t, _) => t,
            // Nonexistent local time (DST gap); keep the file
            LocalResult::None => return false,
        };
        let age_secs = now.signed_duration_since(midnight).num_seconds();
        age_secs > self.retention_days as i64 * 86_400
    }
}

/// Discover artifacts matching the naming convention in a directory,
/// oldest first. A missing directory yields an empty list; files
/// outside the convention are ignored.
pub fn list_artifacts(dir: &Path) -> Result<Vec<StoredArtifact>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut artifacts: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let parsed = name.to_str().and_then(parse_artifact_name)?;
            Some(StoredArtifact {
                path: entry.path(),
                date: parsed.date(),
            })
        })
        .collect();

    artifacts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
    Ok(artifacts)
}
