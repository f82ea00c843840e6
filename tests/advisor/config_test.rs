/*!
 * Advisor Configuration Tests
 * JSON and environment loading, validation at construction
 */

use kv_advisor::advisor::{CapacityBaseline, ReferenceClock};
use kv_advisor::{Advisor, AdvisorConfig, ConfigError};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;

const VARS: [&str; 5] = [
    "ADVISOR_ENABLED",
    "ADVISOR_SAMPLE_RATE",
    "ADVISOR_SLOW_QUERY_MS",
    "ADVISOR_HIGH_READ_UNITS",
    "ADVISOR_HIGH_WRITE_UNITS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_json_options() {
    let config = AdvisorConfig::from_json(
        r#"{
            "enabled": true,
            "sampleRate": 0.25,
            "thresholds": { "slowQueryMs": 250, "highReadUnits": 10 },
            "capacityBaseline": { "readUnitsPerSecond": 100, "writeUnitsPerSecond": 20 },
            "referenceClock": "latestRecord"
        }"#,
    )
    .expect("valid json config");

    assert_eq!(config.sample_rate, 0.25);
    assert_eq!(config.thresholds.slow_query_ms, 250.0);
    assert_eq!(config.thresholds.high_read_units, 10.0);
    // Unspecified thresholds keep their defaults
    assert_eq!(config.thresholds.high_write_units, 50.0);
    assert_eq!(
        config.capacity_baseline,
        Some(CapacityBaseline {
            read_units_per_second: 100.0,
            write_units_per_second: 20.0,
        })
    );
    assert_eq!(config.reference_clock, ReferenceClock::LatestRecord);
}

#[test]
fn test_json_rejects_bad_sample_rate() {
    let err = AdvisorConfig::from_json(r#"{ "sampleRate": 2.0 }"#).unwrap_err();
    assert_eq!(err, ConfigError::InvalidSampleRate(2.0));
}

#[test]
fn test_json_syntax_error() {
    let err = AdvisorConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_construction_fails_fast() {
    let mut config = AdvisorConfig::default();
    config.thresholds.slow_query_ms = -1.0;
    let err = Advisor::new(config).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidThreshold {
            name: "slowQueryMs",
            value: -1.0
        }
    );
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    let config = AdvisorConfig::from_env().expect("defaults are valid");
    assert_eq!(config, AdvisorConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    env::set_var("ADVISOR_ENABLED", "false");
    env::set_var("ADVISOR_SAMPLE_RATE", "0.5");
    env::set_var("ADVISOR_SLOW_QUERY_MS", "300");

    let config = AdvisorConfig::from_env().expect("valid env config");
    clear_env();

    assert!(!config.enabled);
    assert_eq!(config.sample_rate, 0.5);
    assert_eq!(config.thresholds.slow_query_ms, 300.0);
}

#[test]
#[serial]
fn test_from_env_rejects_garbage() {
    clear_env();
    env::set_var("ADVISOR_HIGH_READ_UNITS", "lots");

    let err = AdvisorConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(
        err,
        ConfigError::Env {
            var: "ADVISOR_HIGH_READ_UNITS",
            value: "lots".to_string()
        }
    );
}
