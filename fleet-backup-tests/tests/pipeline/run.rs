//! Full backup runs against the mock API

use std::fs;
use std::sync::Arc;
use test_utils::http_stub::{serve_bytes, serve_status};
use test_utils::{
    artifact_name_days_ago, sample_fleet, write_artifact, BackupOrchestrator, ConfigBuilder,
    MockApi, TestResult,
};

fn file_count(dir: &std::path::Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_run_downloads_newest_backup_for_every_server() -> TestResult {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let backup_dir = config.global.backup_dir.clone();

    let body = vec![3u8; 150_000];
    let mock = MockApi::new()
        .with_servers(sample_fleet())
        .with_backups(101, &[11, 12])
        .with_backups(202, &[21])
        .with_download_url(12, &serve_bytes(body.clone()))
        .with_download_url(21, &serve_bytes(body))
        .with_image_size(12, 0.1)
        .with_image_size(21, 0.1);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock.clone()));
    let summary = orchestrator.run_once();

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert!(summary.fatal.is_none());

    // The newest image (last in the listing) is the one fetched
    assert!(mock.download_url_called_for(12));
    assert!(!mock.download_url_called_for(11));

    assert_eq!(file_count(&backup_dir.join("web-01")), 1);
    assert_eq!(file_count(&backup_dir.join("db-01")), 1);
    Ok(())
}

#[test]
fn test_run_with_empty_fleet_is_not_an_error() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let mock = MockApi::new();

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock));
    let summary = orchestrator.run_once();

    assert_eq!(summary.attempted, 0);
    assert_eq!(summary.failed, 0);
    assert!(summary.fatal.is_none());
}

#[test]
fn test_run_aborts_when_listing_fails() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let mock = MockApi::new().with_failing_list_servers();

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock.clone()));
    let summary = orchestrator.run_once();

    assert_eq!(summary.attempted, 0);
    let fatal = summary.fatal.expect("listing failure must be fatal");
    assert!(fatal.contains("could not list servers"));
    // Nothing was triggered
    assert!(!mock.trigger_called_for(101));
}

#[test]
fn test_run_rotates_expired_artifacts_after_download() -> TestResult {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let backup_dir = config.global.backup_dir.clone();
    let expired = write_artifact(&backup_dir.join("web-01"), &artifact_name_days_ago(30));
    let recent = write_artifact(&backup_dir.join("web-01"), &artifact_name_days_ago(2));

    let mock = MockApi::new()
        .with_server_names(&[(101, "web-01")])
        .with_backups(101, &[11])
        .with_download_url(11, &serve_bytes(vec![5u8; 50_000]))
        .with_image_size(11, 0.1);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock));
    let summary = orchestrator.run_once();

    assert_eq!(summary.succeeded, 1);
    assert!(!expired.exists());
    assert!(recent.exists());
    // The fresh download plus the surviving artifact
    assert_eq!(file_count(&backup_dir.join("web-01")), 2);
    Ok(())
}

#[test]
fn test_integrity_anomaly_keeps_artifact_and_run_succeeds() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let backup_dir = config.global.backup_dir.clone();

    // Metadata promises 10 GiB; the served file is tiny
    let mock = MockApi::new()
        .with_server_names(&[(101, "web-01")])
        .with_backups(101, &[11])
        .with_download_url(11, &serve_bytes(vec![5u8; 10_000]))
        .with_image_size(11, 10.0);

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock));
    let summary = orchestrator.run_once();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(file_count(&backup_dir.join("web-01")), 1);
}

#[test]
fn test_download_failure_counts_server_as_failed() {
    let (config, _temp_dir) = ConfigBuilder::new().persist();
    let backup_dir = config.global.backup_dir.clone();

    let mock = MockApi::new()
        .with_server_names(&[(101, "web-01")])
        .with_backups(101, &[11])
        .with_download_url(11, &serve_status(404, "Not Found"));

    let orchestrator = BackupOrchestrator::new(&config, Arc::new(mock));
    let summary = orchestrator.run_once();

    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.fatal.is_none());
    assert_eq!(file_count(&backup_dir.join("web-01")), 0);
}
