//! Size-verdict boundaries for the integrity heuristic

use fleet_backup::utils::integrity::evaluate;
use rstest::rstest;

const GIB: u64 = 1 << 30;
const MIB: u64 = 1 << 20;

#[rstest]
#[case(10 * GIB, 10 * GIB, true)] // exact match
#[case(10 * GIB + 100 * MIB, 10 * GIB, true)] // 1% over
#[case(98 * GIB / 10, 10 * GIB, true)] // 2% under
#[case(94 * GIB / 10, 10 * GIB, false)] // 6% under
#[case(11 * GIB, 10 * GIB, false)] // 10% over
#[case(50 * MIB, 10 * GIB, false)] // below the floor
fn test_verdict_against_expected_size(
    #[case] actual: u64,
    #[case] expected: u64,
    #[case] ok: bool,
) {
    assert_eq!(evaluate(actual, Some(expected)).ok, ok);
}

#[rstest]
#[case(200 * MIB, true)]
#[case(100 * MIB, true)] // exactly at the floor
#[case(100 * MIB - 1, false)]
#[case(0, false)]
fn test_floor_applies_without_expected_size(#[case] actual: u64, #[case] ok: bool) {
    assert_eq!(evaluate(actual, None).ok, ok);
}

#[test]
fn test_deviation_detail_names_both_sizes() {
    let actual = 9 * GIB;
    let result = evaluate(actual, Some(10 * GIB));
    assert!(!result.ok);
    assert!(result.detail.contains(&actual.to_string()));
    assert!(result.detail.contains(&(10 * GIB).to_string()));
}
