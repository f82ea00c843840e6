/*!
 * Advisor Properties
 * Idempotence, aggregate consistency, batch counting and threshold boundaries
 */

use kv_advisor::advisor::ReferenceClock;
use kv_advisor::{Advisor, AdvisorConfig, AggregateViews, Category, OperationKind, OperationRecord, Severity};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn advisor() -> Advisor {
    let config = AdvisorConfig::builder()
        .reference_clock(ReferenceClock::LatestRecord)
        .build()
        .expect("valid config");
    Advisor::new(config).expect("valid config")
}

fn arb_record() -> impl Strategy<Value = OperationRecord> {
    let shape = (
        0..OperationKind::ALL.len(),
        prop::sample::select(vec!["users", "orders", "events"]),
        prop::option::of(prop::sample::select(vec!["byStatus", "byEmail"])),
        prop::option::of(prop::sample::select(vec!["listActive", "getProfile"])),
        0u64..120_000,
    );
    let metrics = (
        -5.0f64..2_000.0,
        prop::option::of(0.0f64..80.0),
        prop::option::of(0.0f64..80.0),
        (0u64..50, prop::option::of(0u64..2_000)),
        prop::option::of(prop::sample::select(vec!["USER#1", "USER#2", "17", "2024-03-01"])),
        prop::option::of(0u64..400_000),
        any::<bool>(),
    );

    (shape, metrics)
        .prop_map(
            |((kind, table, index, pattern, ts), (latency, rcu, wcu, (items, scanned), pk, size, filtered))| {
                let mut record = OperationRecord::new(OperationKind::ALL[kind], table, ts)
                    .with_latency_ms(latency)
                    .with_item_count(items)
                    .with_filter_applied(filtered);
                if let Some(index) = index {
                    record = record.with_index(index);
                }
                if let Some(pattern) = pattern {
                    record = record.with_access_pattern(pattern);
                }
                if let Some(units) = rcu {
                    record = record.with_read_units(units);
                }
                if let Some(units) = wcu {
                    record = record.with_write_units(units);
                }
                if let Some(scanned) = scanned {
                    record = record.with_scanned_count(scanned);
                }
                if let Some(pk) = pk {
                    record = record.with_partition_key(pk);
                }
                if let Some(size) = size {
                    record = record.with_item_size(size);
                }
                record
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_recommendations_idempotent(records in prop::collection::vec(arb_record(), 0..150)) {
        let advisor = advisor();
        for record in records {
            advisor.record(record);
        }
        let first = advisor.get_recommendations();
        let second = advisor.get_recommendations();
        prop_assert_eq!(first, second);
        prop_assert_eq!(advisor.detector_failures(), 0);
    }

    #[test]
    fn test_stats_match_export_replay(records in prop::collection::vec(arb_record(), 0..150)) {
        let advisor = advisor();
        for record in records {
            advisor.record(record);
        }
        let exported = advisor.export();
        prop_assert_eq!(advisor.get_stats(), AggregateViews::replay(&exported));
    }

    #[test]
    fn test_batch_count_is_ceiling(n in 3u64..200) {
        let advisor = advisor();
        for i in 0..n {
            advisor.record(OperationRecord::new(OperationKind::Put, "users", i * 5).with_partition_key("USER#1"));
        }
        let recs = advisor.get_recommendations();
        let batch: Vec<_> = recs.iter().filter(|r| r.category == Category::BatchOpportunity).collect();
        prop_assert_eq!(batch.len(), 1);
        let expected = format!("{} individual writes could become {} batch write requests", n, n.div_ceil(25));
        prop_assert!(batch[0].message.contains(&expected), "{}", batch[0].message);
    }
}

fn inefficient_scans(n: u64) -> Vec<OperationRecord> {
    (0..n)
        .map(|i| {
            OperationRecord::new(OperationKind::Scan, "orders", i * 5_000)
                .with_item_count(1)
                .with_scanned_count(1_000)
        })
        .collect()
}

#[test]
fn test_two_qualifying_operations_are_not_enough() {
    let advisor = advisor();
    for record in inefficient_scans(2) {
        advisor.record(record);
    }
    assert!(advisor.get_recommendations().is_empty());
}

#[test]
fn test_three_qualifying_operations_trigger() {
    let advisor = advisor();
    for record in inefficient_scans(3) {
        advisor.record(record);
    }
    let recs = advisor.get_recommendations();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].category, Category::ScanInefficiency);
    assert_eq!(recs[0].severity, Severity::Warning);
}

#[test]
fn test_forty_percent_efficiency_is_info() {
    let advisor = advisor();
    for i in 0..3 {
        advisor.record(
            OperationRecord::new(OperationKind::Scan, "orders", i * 5_000)
                .with_item_count(400)
                .with_scanned_count(1_000),
        );
    }
    let recs = advisor.get_recommendations();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].severity, Severity::Info);
}

#[test]
fn test_reset_clears_everything() {
    let advisor = advisor();
    for record in inefficient_scans(5) {
        advisor.record(record);
    }
    assert!(!advisor.get_recommendations().is_empty());

    advisor.reset();
    assert_eq!(advisor.get_stats(), AggregateViews::default());
    assert!(advisor.get_recommendations().is_empty());
    assert!(advisor.export().is_empty());
}
