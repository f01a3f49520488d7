//! Artifact naming round-trips and rejection of foreign names

use chrono::{Datelike, NaiveDate};
use fleet_backup::utils::naming::{artifact_file_name, parse_artifact_name};
use rstest::rstest;

#[test]
fn test_file_name_encodes_date_and_time() {
    let stamp = NaiveDate::from_ymd_opt(2026, 8, 3)
        .unwrap()
        .and_hms_opt(4, 5, 6)
        .unwrap();
    assert_eq!(artifact_file_name(&stamp), "backup-2026-08-03-040506.tar.gz");
}

#[test]
fn test_name_round_trips() {
    let stamp = NaiveDate::from_ymd_opt(2026, 1, 31)
        .unwrap()
        .and_hms_opt(23, 59, 58)
        .unwrap();
    let name = artifact_file_name(&stamp);
    assert_eq!(parse_artifact_name(&name), Some(stamp));
}

#[rstest]
#[case("backup-2026-08-03-120000.tar.gz", Some((2026, 8, 3)))]
#[case("backup-2026-08-03.tar.gz", Some((2026, 8, 3)))]
#[case("notes.txt", None)]
#[case("backup-latest.tar.gz", None)]
#[case("backup-2026-08-03.zip", None)]
#[case("backup-2026-13-03-120000.tar.gz", None)]
#[case("backup-2026-08-03-1200.tar.gz", None)]
fn test_parse_recognizes_only_convention_names(
    #[case] name: &str,
    #[case] expected: Option<(i32, u32, u32)>,
) {
    let parsed = parse_artifact_name(name).map(|stamp| {
        let date = stamp.date();
        (date.year(), date.month(), date.day())
    });
    assert_eq!(parsed, expected);
}

#[test]
fn test_date_only_names_parse_to_midnight() {
    let stamp = parse_artifact_name("backup-2024-02-29.tar.gz").unwrap();
    assert_eq!(stamp.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(stamp.time(), chrono::NaiveTime::MIN);
}
