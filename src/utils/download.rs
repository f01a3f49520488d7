//! Streaming image downloader
//!
//! Images are multi-gigabyte, so the body is streamed to disk in fixed
//! chunks, never buffered whole. A failed transfer removes the partial
//! file; rotation must never see half-written artifacts.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::naming::artifact_file_name;

/// Copy buffer size for streaming the body to disk
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Download failed with status {status}")]
    Http { status: u16 },

    #[error("Download request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Download transfer failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Download truncated: got {got} of {expected} bytes")]
    Truncated { got: u64, expected: u64 },
}

pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// A downloaded backup file on local storage
#[derive(Debug, Clone)]
pub struct LocalArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Progress observer, called with the completed fraction after each
/// chunk. Only invoked when the server advertises a total size.
pub type ProgressFn = Box<dyn Fn(f64) + Send + Sync>;

/// Streams backup images from their pre-signed URLs to local storage
pub struct Downloader {
    timeout: Duration,
    progress: Option<ProgressFn>,
}

impl Downloader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            progress: None,
        }
    }

    /// Attach a progress observer
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Download `url` into `{target_dir}/{server_name}/`, named by the
    /// current timestamp. Returns the final path and size.
    pub fn download(
        &self,
        url: &str,
        server_name: &str,
        target_dir: &Path,
    ) -> DownloadResult<LocalArtifact> {
        let server_dir = target_dir.join(server_name);
        fs::create_dir_all(&server_dir)?;

        let file_name = artifact_file_name(&chrono::Local::now().naive_local());
        let path = server_dir.join(file_name);

        info!("Downloading backup for '{}' to {:?}", server_name, path);
        match self.stream_to_file(url, &path) {
            Ok(size_bytes) => {
                info!("Downloaded {:?} ({} bytes)", path, size_bytes);
                Ok(LocalArtifact { path, size_bytes })
            }
            Err(e) => {
                // Never leave a partial artifact behind
                if path.exists() {
                    if let Err(rm) = fs::remove_file(&path) {
                        warn!("Failed to remove partial download {:?}: {}", path, rm);
                    }
                }
                Err(e)
            }
        }
    }

    fn stream_to_file(&self, url: &str, path: &Path) -> DownloadResult<u64> {
        // Download links are pre-signed, no auth header here
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(DownloadError::Request)?;

        let mut response = client.get(url).send().map_err(DownloadError::Request)?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(DownloadError::Http { status });
        }

        let total = response.content_length();
        let mut file = File::create(path)?;
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            let read = response.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])?;
            downloaded += read as u64;

            if let (Some(progress), Some(total)) = (&self.progress, total) {
                if total > 0 {
                    progress(downloaded as f64 / total as f64);
                }
            }
        }
        file.flush()?;
        drop(file);

        if let Some(expected) = total {
            if downloaded < expected {
                return Err(DownloadError::Truncated {
                    got: downloaded,
                    expected,
                });
            }
        }

        debug!("Transfer finished: {} bytes", downloaded);
        Ok(downloaded)
    }
}
