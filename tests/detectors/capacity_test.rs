/*!
 * Capacity Mode Tests
 * Throughput measured through the engine, including sampled buffers
 */

use kv_advisor::detectors::{measure, DetectionContext, Dimension};
use kv_advisor::{Advisor, AdvisorConfig, AggregateViews, Category, OperationKind, OperationRecord, Severity};

fn writes(seconds: u64, units: f64) -> Vec<OperationRecord> {
    (0..seconds)
        .map(|s| OperationRecord::new(OperationKind::Put, "metrics", s * 1000).with_write_units(units))
        .collect()
}

#[test]
fn test_idle_write_capacity_flagged() {
    let config = AdvisorConfig::builder()
        .capacity_baseline(1_000.0, 500.0)
        .build()
        .expect("valid config");
    let advisor = Advisor::new(config).expect("valid config");
    for record in writes(240, 5.0) {
        advisor.record(record);
    }

    let recs = advisor.get_recommendations();
    let capacity: Vec<_> = recs
        .iter()
        .filter(|r| r.detector.as_str() == "capacity-mode")
        .collect();
    assert_eq!(capacity.len(), 1);
    assert_eq!(capacity[0].category, Category::Cost);
    assert_eq!(capacity[0].severity, Severity::Info);
    assert_eq!(capacity[0].scope.as_deref(), Some("write"));
    let cost = capacity[0]
        .estimated_impact
        .as_ref()
        .and_then(|i| i.cost.as_deref())
        .unwrap_or_default();
    assert!(cost.contains("/month"), "unexpected cost text: {}", cost);
}

#[test]
fn test_peak_scaled_by_sampling_ratio() {
    let records = writes(180, 2.0);
    // Keep every other record, as a 50% sampler would
    let retained: Vec<OperationRecord> = records.iter().step_by(2).cloned().collect();

    let mut views = AggregateViews::replay(&records);
    views.buffered_records = retained.len() as u64;
    views.sampled_out = (records.len() - retained.len()) as u64;

    let config = AdvisorConfig::default();
    let ctx = DetectionContext::new(&retained, &views, &config, 0);
    let write = measure(&ctx, Dimension::Write).expect("write units present");

    assert!((write.mean_rate - 2.0).abs() < 1e-9);
    assert!((write.peak_rate - 2.0).abs() < 1e-9);
}

#[test]
fn test_monthly_cost_arithmetic() {
    let pricing = AdvisorConfig::default().pricing;
    // 1 write unit per second for 30 days at $1.25 per million
    let on_demand = Dimension::Write.on_demand_monthly(&pricing, 1.0);
    assert!((on_demand - 3.24).abs() < 1e-9);
    // 10 provisioned read units for 720 hours at $0.00013 per unit-hour
    let provisioned = Dimension::Read.provisioned_monthly(&pricing, 10.0);
    assert!((provisioned - 0.936).abs() < 1e-9);
}
