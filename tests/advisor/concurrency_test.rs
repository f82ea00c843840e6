/*!
 * Concurrent Recording
 * Parallel writers and readers sharing one advisor
 */

use kv_advisor::{Advisor, AdvisorConfig, AggregateViews, OperationKind, OperationRecord};
use pretty_assertions::assert_eq;
use std::thread;

#[test]
fn test_parallel_record_loses_nothing() {
    let advisor = Advisor::new(AdvisorConfig::default()).expect("valid config");
    let threads = 8;
    let per_thread = 500u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let advisor = advisor.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    advisor.record(
                        OperationRecord::new(OperationKind::Get, "users", t * 10_000 + i)
                            .with_partition_key(format!("USER#{}", i % 50))
                            .with_read_units(1.0),
                    );
                }
            })
        })
        .collect();

    // Readers run alongside the writers
    let reader = {
        let advisor = advisor.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                let stats = advisor.get_stats();
                assert_eq!(stats.total_operations, stats.buffered_records + stats.sampled_out);
                let _ = advisor.get_recommendations();
            }
        })
    };

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    reader.join().expect("reader thread panicked");

    let stats = advisor.get_stats();
    assert_eq!(stats.total_operations, threads * per_thread);
    assert_eq!(stats.operation(OperationKind::Get).total_read_units, (threads * per_thread) as f64);
    assert_eq!(stats, AggregateViews::replay(&advisor.export()));
}
