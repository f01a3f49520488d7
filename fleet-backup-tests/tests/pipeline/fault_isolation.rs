//! Per-server fault isolation
//!
//! One server failing at any pipeline stage must not keep the rest of
//! the fleet from being backed up.

use std::fs;
use std::sync::Arc;
use test_utils::http_stub::serve_bytes;
use test_utils::{sample_fleet, ActionStatus, BackupOrchestrator, ConfigBuilder, MockApi};

#[test]
fn test_trigger_failure_does_not_stop_other_servers() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let backup_dir = config.global.backup_dir.clone();

    let mock = MockApi::new()
        .with_servers(sample_fleet())
        .with_failing_trigger(101)
        .with_backups(202, &[21])
        .with_download_url(21, &serve_bytes(vec![8u8; 40_000]))
        .with_image_size(21, 0.1);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock.clone()));
    let summary = orchestrator.run_once();

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.fatal.is_none());

    // Both servers were attempted, only the healthy one produced a file
    assert!(mock.trigger_called_for(101));
    assert!(mock.trigger_called_for(202));
    assert!(!backup_dir.join("web-01").exists());
    assert_eq!(fs::read_dir(backup_dir.join("db-01")).unwrap().count(), 1);
}

#[test]
fn test_errored_action_counts_as_failure() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();

    let mock = MockApi::new()
        .with_server_names(&[(101, "web-01")])
        .with_errored_action("Backup disk unavailable")
        .with_backups(101, &[11]);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock.clone()));
    let summary = orchestrator.run_once();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 0);
    // The pipeline stopped before resolving a download
    assert!(!mock.download_url_called_for(11));
}

#[test]
fn test_action_timeout_counts_as_failure() {
    let (config, _temp_dir) = ConfigBuilder::new().with_action_timeout(0).persist();

    let mock = MockApi::new()
        .with_server_names(&[(101, "web-01")])
        .with_action_sequence(&[ActionStatus::Pending]);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock.clone()));
    let summary = orchestrator.run_once();

    assert_eq!(summary.failed, 1);
    assert!(mock.poll_count() >= 1);
}

#[test]
fn test_missing_backup_listing_counts_as_failure() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();

    // Action completes but the server reports no backup images
    let mock = MockApi::new().with_server_names(&[(101, "web-01")]);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock.clone()));
    let summary = orchestrator.run_once();

    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.failed, 1);
    assert!(mock.trigger_called_for(101));
}
