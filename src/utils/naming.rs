//! Artifact naming convention
//!
//! Local backup files are named `backup-{YYYY-MM-DD}-{HHMMSS}.tar.gz`.
//! The embedded timestamp is the only persistence: rotation derives age
//! from the name, never from filesystem metadata. Files written by
//! earlier deployments carry the date without a time part.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const ARTIFACT_PREFIX: &str = "backup-";
pub const ARTIFACT_SUFFIX: &str = ".tar.gz";

/// Build an artifact file name for the given timestamp
pub fn artifact_file_name(timestamp: &NaiveDateTime) -> String {
    format!(
        "{}{}-{}{}",
        ARTIFACT_PREFIX,
        timestamp.format("%Y-%m-%d"),
        timestamp.format("%H%M%S"),
        ARTIFACT_SUFFIX
    )
}

/// Parse the timestamp embedded in an artifact file name.
/// Returns None for names outside the convention.
pub fn parse_artifact_name(file_name: &str) -> Option<NaiveDateTime> {
    let stem = file_name
        .strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_SUFFIX)?;

    if let Ok(parsed) = NaiveDateTime::parse_from_str(stem, "%Y-%m-%d-%H%M%S") {
        return Some(parsed);
    }

    // Date-only names written by earlier deployments
    NaiveDate::parse_from_str(stem, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}
