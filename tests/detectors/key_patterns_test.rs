/*!
 * Key Pattern Predicate Properties
 */

use kv_advisor::detectors::key_patterns::{is_concatenated, is_epoch_like, is_iso8601, is_temporal, parse_integer};
use kv_advisor::detectors::{increasing_ratio, temporal_ratio};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_calendar_dates_are_temporal(year in 2000i32..2099, month in 1u8..=12, day in 1u8..=28) {
        let date = format!("{:04}-{:02}-{:02}", year, month, day);
        prop_assert!(is_iso8601(&date));
        let key = format!("ORDER#{}", date);
        prop_assert!(is_temporal(&key));
    }

    #[test]
    fn test_small_integers_are_not_epochs(n in 0i64..1_000_000) {
        prop_assert_eq!(parse_integer(&n.to_string()), Some(n));
        prop_assert!(!is_epoch_like(&n.to_string()));
    }

    #[test]
    fn test_epoch_seconds_in_range(secs in 946_684_800i64..4_102_444_800) {
        prop_assert!(is_epoch_like(&secs.to_string()));
        prop_assert!(is_epoch_like(&(secs * 1000).to_string()));
    }

    #[test]
    fn test_two_segments_never_concatenated(a in "[A-Z]{1,8}", b in "[a-z0-9]{1,8}") {
        let two = format!("{}#{}", a, b);
        let three = format!("{}#{}#{}", a, b, a);
        prop_assert!(!is_concatenated(&two));
        prop_assert!(is_concatenated(&three));
    }

    #[test]
    fn test_strictly_increasing_ratio_is_one(start in 0i64..1_000, len in 2usize..50) {
        let values: Vec<String> = (0..len as i64).map(|i| (start + i).to_string()).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        prop_assert_eq!(increasing_ratio(&refs), Some(1.0));
    }
}

#[test]
fn test_mixed_values_temporal_ratio() {
    let values = ["2024-01-01", "USER#1", "1700000000", "plain"];
    assert_eq!(temporal_ratio(&values), 0.5);
    assert_eq!(temporal_ratio(&[]), 0.0);
}
