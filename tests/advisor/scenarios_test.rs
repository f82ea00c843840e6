/*!
 * End-to-End Scenarios
 * Record realistic traffic through the public API and check the advice
 */

use kv_advisor::{Advisor, AdvisorConfig, Category, OperationKind, OperationRecord, Recommendation, Severity};
use pretty_assertions::assert_eq;

fn advisor() -> Advisor {
    Advisor::new(AdvisorConfig::default()).expect("default config is valid")
}

fn of_category(recs: &[Recommendation], category: Category) -> Vec<&Recommendation> {
    recs.iter().filter(|r| r.category == category).collect()
}

#[test]
fn test_burst_of_puts_suggests_batch_write() {
    let advisor = advisor();
    for i in 0..30 {
        advisor.record(
            OperationRecord::new(OperationKind::Put, "users", 1_000 + i * 10).with_partition_key("USER#1"),
        );
    }

    let recs = advisor.get_recommendations();
    let batch = of_category(&recs, Category::BatchOpportunity);
    assert_eq!(batch.len(), 1);
    assert!(
        batch[0].message.contains("30 individual writes could become 2 batch write requests"),
        "unexpected message: {}",
        batch[0].message
    );
    assert_eq!(batch[0].detector.as_str(), "batch-opportunity");
}

#[test]
fn test_get_then_put_suggests_update() {
    let advisor = advisor();
    for base in [0u64, 10_000, 20_000] {
        advisor.record(OperationRecord::new(OperationKind::Get, "users", base).with_key("USER#1", "PROFILE"));
        advisor.record(
            OperationRecord::new(OperationKind::Put, "users", base + 1_000).with_key("USER#1", "PROFILE"),
        );
    }

    let recs = advisor.get_recommendations();
    let rbw = of_category(&recs, Category::ReadBeforeWrite);
    assert_eq!(rbw.len(), 1);
    assert_eq!(rbw[0].severity, Severity::Warning);
    assert_eq!(rbw[0].occurrences, 3);
}

#[test]
fn test_overlapping_get_then_put_suggests_update() {
    let advisor = advisor();
    for base in [0u64, 100, 200] {
        advisor.record(OperationRecord::new(OperationKind::Get, "users", base).with_key("USER#1", "PROFILE"));
        advisor.record(
            OperationRecord::new(OperationKind::Put, "users", base + 1_000).with_key("USER#1", "PROFILE"),
        );
    }

    let recs = advisor.get_recommendations();
    let rbw = of_category(&recs, Category::ReadBeforeWrite);
    assert_eq!(rbw.len(), 1);
    assert_eq!(rbw[0].occurrences, 3);
}

#[test]
fn test_wasteful_scans_warn() {
    let advisor = advisor();
    for i in 0..25 {
        advisor.record(
            OperationRecord::new(OperationKind::Scan, "orders", i * 5_000)
                .with_access_pattern("listActive")
                .with_item_count(2)
                .with_scanned_count(1_000),
        );
    }

    let recs = advisor.get_recommendations();
    let scans = of_category(&recs, Category::ScanInefficiency);
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].severity, Severity::Warning);
    assert_eq!(scans[0].scope.as_deref(), Some("listActive"));

    let stats = advisor.get_stats();
    assert_eq!(stats.by_access_pattern["listActive"].total_items_returned, 50);
}

#[test]
fn test_sequential_partition_keys_warn() {
    let advisor = advisor();
    for i in 1..=25u64 {
        advisor.record(OperationRecord::new(OperationKind::Put, "events", i * 2_000).with_partition_key(i.to_string()));
    }

    let recs = advisor.get_recommendations();
    let uniform = of_category(&recs, Category::UniformPartitionKey);
    assert_eq!(uniform.len(), 1);
    assert_eq!(uniform[0].severity, Severity::Warning);
    let action = uniform[0].suggested_action.as_deref().unwrap_or_default();
    assert!(action.contains("randomized or hashed"));
}

#[test]
fn test_single_large_item_warns() {
    let advisor = advisor();
    advisor.record(OperationRecord::new(OperationKind::Put, "documents", 0).with_item_size(350_000));

    let recs = advisor.get_recommendations();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].category, Category::LargeItem);
    assert_eq!(recs[0].severity, Severity::Warning);
}

#[test]
fn test_recommendations_sorted_by_severity() {
    let advisor = advisor();
    // Hot key (error) plus a large item (warning) plus a medium item (info)
    for i in 0..12 {
        advisor.record(OperationRecord::new(OperationKind::Get, "users", i * 5_000).with_partition_key("USER#1"));
    }
    advisor.record(OperationRecord::new(OperationKind::Put, "blobs", 0).with_item_size(350_000));
    advisor.record(
        OperationRecord::new(OperationKind::Put, "notes", 0)
            .with_item_size(150_000)
            .with_access_pattern("saveNote"),
    );

    let recs = advisor.get_recommendations();
    let severities: Vec<Severity> = recs.iter().map(|r| r.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(severities, sorted);
    assert_eq!(recs[0].category, Category::HotPartition);
    assert_eq!(recs[0].severity, Severity::Error);
}

#[test]
fn test_recommendation_json_shape() {
    let advisor = advisor();
    advisor.record(OperationRecord::new(OperationKind::Put, "documents", 0).with_item_size(350_000));

    let recs = advisor.get_recommendations();
    let json = serde_json::to_value(&recs[0]).expect("recommendation serializes");
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["category"], "large-item");
    assert_eq!(json["affectedOperations"][0], "put");
    assert!(json["suggestedAction"].is_string());
}
