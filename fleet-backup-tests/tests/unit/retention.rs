//! Retention window boundaries

use fleet_backup::utils::retention::{list_artifacts, RetentionManager};
use rstest::rstest;
use test_utils::{artifact_name_days_ago, write_artifact, TestContext};

#[rstest]
#[case(15, 14, false)]
#[case(13, 14, true)]
#[case(2, 1, false)]
#[case(20, 30, true)]
fn test_rotation_boundary(#[case] days_ago: i64, #[case] retention: u32, #[case] survives: bool) {
    let ctx = TestContext::new();
    let server_dir = ctx.server_dir("web-01");
    let path = write_artifact(&server_dir, &artifact_name_days_ago(days_ago));

    let manager = RetentionManager::new(retention);
    manager.rotate("web-01", ctx.root()).unwrap();

    assert_eq!(path.exists(), survives);
}

#[test]
fn test_expired_lists_without_deleting() {
    let ctx = TestContext::new();
    let server_dir = ctx.server_dir("web-01");
    let old = write_artifact(&server_dir, &artifact_name_days_ago(20));
    let recent = write_artifact(&server_dir, &artifact_name_days_ago(1));

    let manager = RetentionManager::new(14);
    let expired = manager.expired(&server_dir).unwrap();

    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].path, old);
    assert!(old.exists());
    assert!(recent.exists());
}

#[test]
fn test_list_artifacts_skips_foreign_files() {
    let ctx = TestContext::new();
    let server_dir = ctx.server_dir("web-01");
    write_artifact(&server_dir, &artifact_name_days_ago(1));
    write_artifact(&server_dir, "notes.txt");
    write_artifact(&server_dir, "backup-latest.tar.gz");

    let artifacts = list_artifacts(&server_dir).unwrap();
    assert_eq!(artifacts.len(), 1);
}

#[test]
fn test_rotation_ignores_other_servers() {
    let ctx = TestContext::new();
    let other = write_artifact(&ctx.server_dir("db-01"), &artifact_name_days_ago(30));

    let manager = RetentionManager::new(14);
    let deleted = manager.rotate("web-01", ctx.root()).unwrap();

    assert!(deleted.is_empty());
    assert!(other.exists());
}
