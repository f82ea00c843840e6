/*!
 * Detector Catalogue Tests
 * Declaration order, custom catalogues and prioritization through the engine
 */

use kv_advisor::advisor::ReferenceClock;
use kv_advisor::detectors::{
    default_catalogue, DetectionContext, Detector, DetectorResult, HotPartitionDetector, LargeItemDetector,
};
use kv_advisor::{Advisor, AdvisorConfig, Category, OperationKind, OperationRecord, Recommendation, Severity};
use pretty_assertions::assert_eq;

#[test]
fn test_default_catalogue_order() {
    let names: Vec<&str> = default_catalogue().iter().map(|d| d.name()).collect();
    assert_eq!(
        names,
        vec![
            "hot-partition",
            "scan-efficiency",
            "fetching-to-filter",
            "batch-opportunity",
            "read-before-write",
            "large-item",
            "uniform-partition-key",
            "unused-index",
            "capacity-mode",
            "multi-attribute-key",
            "expensive-operations",
        ]
    );
}

/// Emits one info candidate per buffered table
struct TablesDetector;

impl Detector for TablesDetector {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let mut tables: Vec<&str> = ctx.records.iter().map(|r| r.table_name.as_str()).collect();
        tables.sort_unstable();
        tables.dedup();
        Ok(tables
            .into_iter()
            .map(|t| Recommendation::new(Severity::Info, Category::BestPractice, format!("table {}", t), ""))
            .collect())
    }
}

#[test]
fn test_custom_catalogue_ties_follow_declaration_order() {
    let catalogue: Vec<Box<dyn Detector>> = vec![Box::new(TablesDetector), Box::new(LargeItemDetector)];
    let advisor = Advisor::with_catalogue(AdvisorConfig::default(), catalogue).expect("valid config");
    advisor.record(OperationRecord::new(OperationKind::Put, "b", 0).with_item_size(150_000));
    advisor.record(OperationRecord::new(OperationKind::Put, "a", 0));

    let recs = advisor.get_recommendations();
    let detectors: Vec<&str> = recs.iter().map(|r| r.detector.as_str()).collect();
    // Large-item carries an impact score so it outranks unscored candidates of equal severity
    assert_eq!(detectors, vec!["large-item", "tables", "tables"]);
    assert_eq!(recs[1].message, "table a");
    assert_eq!(recs[2].message, "table b");
}

#[test]
fn test_same_key_flagged_from_two_angles() {
    let advisor = Advisor::new(AdvisorConfig::default()).expect("valid config");
    for i in 0..25u64 {
        advisor.record(OperationRecord::new(OperationKind::Put, "events", i * 10).with_partition_key("2024-03-01"));
    }

    let recs = advisor.get_recommendations();
    let categories: Vec<Category> = recs.iter().map(|r| r.category).collect();
    assert!(categories.contains(&Category::HotPartition));
    assert!(categories.contains(&Category::UniformPartitionKey));
    assert!(categories.contains(&Category::BatchOpportunity));
}

#[test]
fn test_unused_index_against_latest_record() {
    let config = AdvisorConfig::builder()
        .reference_clock(ReferenceClock::LatestRecord)
        .build()
        .expect("valid config");
    let advisor = Advisor::with_catalogue(config, default_catalogue()).expect("valid config");
    let day = 24 * 60 * 60 * 1000;
    advisor.record(OperationRecord::new(OperationKind::Query, "orders", 0).with_index("byStatus"));
    advisor.record(OperationRecord::new(OperationKind::Query, "orders", 10 * day).with_index("byCustomer"));

    let recs = advisor.get_recommendations();
    let unused: Vec<_> = recs.iter().filter(|r| r.category == Category::UnusedIndex).collect();
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].scope.as_deref(), Some("orders/byStatus"));
}

#[test]
fn test_single_detector_catalogue() {
    let catalogue: Vec<Box<dyn Detector>> = vec![Box::new(HotPartitionDetector)];
    let advisor = Advisor::with_catalogue(AdvisorConfig::default(), catalogue).expect("valid config");
    for i in 0..10u64 {
        let key = if i < 6 { "HOT" } else { "COLD" };
        advisor.record(OperationRecord::new(OperationKind::Get, "users", i * 5_000).with_partition_key(key));
    }

    let recs = advisor.get_recommendations();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].severity, Severity::Error);
    assert!(recs[0].message.contains("HOT"));
    assert_eq!(recs[1].severity, Severity::Warning);
}
