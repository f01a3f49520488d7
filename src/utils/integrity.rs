//! Artifact integrity verification
//!
//! A size-based heuristic: the downloaded file must be within 5% of the
//! size the image metadata reports, and never below an absolute floor.
//! When metadata is unavailable the floor still applies; a metadata
//! outage must not mask an empty download.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::api::ApiOperations;
use crate::managers::notification::NotificationManager;

/// Relative size tolerance against the expected image size
const SIZE_TOLERANCE: f64 = 0.05;
/// Absolute floor; anything smaller cannot be a full disk image
const MIN_ARTIFACT_BYTES: u64 = 100 * 1024 * 1024;
const BYTES_PER_GIGABYTE: f64 = (1u64 << 30) as f64;

/// Outcome of an integrity check. A failed check is a reported
/// condition, not an error: the pipeline continues either way.
#[derive(Debug, Clone)]
pub struct IntegrityResult {
    pub ok: bool,
    pub detail: String,
}

/// Verifies downloaded artifacts against image metadata
pub struct IntegrityChecker {
    notifier: Option<NotificationManager>,
}

impl IntegrityChecker {
    pub fn new(notifier: Option<NotificationManager>) -> Self {
        Self { notifier }
    }

    /// Check the artifact at `path` against the expected size of
    /// `image_id`. Reading local file metadata can fail; the verdict
    /// itself never raises. Emits an alert when the check fails.
    pub fn verify(
        &self,
        api: &dyn ApiOperations,
        path: &Path,
        server_name: &str,
        image_id: i64,
    ) -> Result<IntegrityResult> {
        let actual = std::fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for {:?}", path))?
            .len();

        let expected = match api.image_size_gigabytes(image_id) {
            Ok(gigabytes) if gigabytes > 0.0 => Some((gigabytes * BYTES_PER_GIGABYTE) as u64),
            Ok(gigabytes) => {
                warn!(
                    "Image {} reports non-positive size {}, using floor check only",
                    image_id, gigabytes
                );
                None
            }
            Err(e) => {
                warn!(
                    "Could not fetch size for image {}: {}, using floor check only",
                    image_id, e
                );
                None
            }
        };

        let result = evaluate(actual, expected);
        if result.ok {
            info!("Integrity check passed for '{}': {}", server_name, result.detail);
        } else {
            warn!("Integrity check failed for '{}': {}", server_name, result.detail);
            if let Some(ref notifier) = self.notifier {
                notifier.alert(&format!(
                    "Backup integrity check failed for server '{}': {}",
                    server_name, result.detail
                ));
            }
        }
        Ok(result)
    }
}

/// Pure size verdict: the absolute floor always applies, the 5%
/// relative tolerance only when an expected size is known.
pub fn evaluate(actual_bytes: u64, expected_bytes: Option<u64>) -> IntegrityResult {
    if actual_bytes < MIN_ARTIFACT_BYTES {
        return IntegrityResult {
            ok: false,
            detail: format!(
                "file is {} bytes, below the {} MiB floor",
                actual_bytes,
                MIN_ARTIFACT_BYTES / (1024 * 1024)
            ),
        };
    }

    match expected_bytes {
        Some(expected) if expected > 0 => {
            let deviation = (actual_bytes as f64 - expected as f64).abs() / expected as f64;
            if deviation > SIZE_TOLERANCE {
                IntegrityResult {
                    ok: false,
                    detail: format!(
                        "size {} deviates {:.1}% from expected {} bytes",
                        actual_bytes,
                        deviation * 100.0,
                        expected
                    ),
                }
            } else {
                IntegrityResult {
                    ok: true,
                    detail: format!(
                        "size {} within {:.1}% of expected {} bytes",
                        actual_bytes,
                        deviation * 100.0,
                        expected
                    ),
                }
            }
        }
        _ => IntegrityResult {
            ok: true,
            detail: format!("size {} passes floor check, no expected size available", actual_bytes),
        },
    }
}
