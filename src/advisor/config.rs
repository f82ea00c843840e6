/*!
 * Advisor Configuration
 *
 * Recognized options, defaults, and construction-time validation.
 */

use crate::core::errors::ConfigError;
use crate::core::limits::*;
use crate::core::types::Name;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Severity cutoffs shared by several detectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    /// Average latency above which an access pattern is slow (default: 1000ms)
    pub slow_query_ms: f64,

    /// Average read units per operation considered expensive (default: 50)
    pub high_read_units: f64,

    /// Average write units per operation considered expensive (default: 50)
    pub high_write_units: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            slow_query_ms: DEFAULT_SLOW_QUERY_MS,
            high_read_units: DEFAULT_HIGH_READ_UNITS,
            high_write_units: DEFAULT_HIGH_WRITE_UNITS,
        }
    }
}

/// Provisioned throughput of the observed table, in units per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityBaseline {
    pub read_units_per_second: f64,
    pub write_units_per_second: f64,
}

/// Unit-cost constants used for rough monthly estimates (USD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitPricing {
    pub on_demand_read_per_million: f64,
    pub on_demand_write_per_million: f64,
    pub provisioned_read_per_unit_hour: f64,
    pub provisioned_write_per_unit_hour: f64,
}

impl Default for UnitPricing {
    fn default() -> Self {
        Self {
            on_demand_read_per_million: DEFAULT_ON_DEMAND_READ_PER_MILLION,
            on_demand_write_per_million: DEFAULT_ON_DEMAND_WRITE_PER_MILLION,
            provisioned_read_per_unit_hour: DEFAULT_PROVISIONED_READ_PER_HOUR,
            provisioned_write_per_unit_hour: DEFAULT_PROVISIONED_WRITE_PER_HOUR,
        }
    }
}

/// Reference point for "recent" when judging index usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceClock {
    /// Later of the latest record and the current wall-clock time
    #[default]
    WallClock,
    /// Timestamp of the latest recorded operation
    LatestRecord,
}

/// Secondary index declared on a table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRef {
    pub table_name: Name,
    pub index_name: Name,
}

impl IndexRef {
    pub fn new(table_name: impl Into<Name>, index_name: impl Into<Name>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: index_name.into(),
        }
    }
}

/// Advisor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorConfig {
    /// When false, recording is a no-op (default: true)
    pub enabled: bool,

    /// Fraction of calls retained in the raw buffer (default: 1.0)
    pub sample_rate: f64,

    pub thresholds: Thresholds,

    /// Provisioned throughput; absent for on-demand tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_baseline: Option<CapacityBaseline>,

    pub pricing: UnitPricing,

    pub reference_clock: ReferenceClock,

    /// Declared secondary indexes, flagged if never observed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub known_indexes: Vec<IndexRef>,

    /// Fixed sampler seed (deterministic sampling)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler_seed: Option<u64>,
}

impl AdvisorConfig {
    /// Create default configuration (full capture, default thresholds)
    pub fn new() -> Self {
        Self {
            enabled: true,
            sample_rate: 1.0,
            thresholds: Thresholds::default(),
            capacity_baseline: None,
            pricing: UnitPricing::default(),
            reference_clock: ReferenceClock::default(),
            known_indexes: Vec::new(),
            sampler_seed: None,
        }
    }

    /// Create configuration with recording disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Parse camelCase JSON and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `ADVISOR_*` environment variables
    ///
    /// Recognized: ADVISOR_ENABLED, ADVISOR_SAMPLE_RATE, ADVISOR_SLOW_QUERY_MS,
    /// ADVISOR_HIGH_READ_UNITS, ADVISOR_HIGH_WRITE_UNITS
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(value) = lookup("ADVISOR_ENABLED") {
            config.enabled = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Env {
                        var: "ADVISOR_ENABLED",
                        value,
                    })
                }
            };
        }

        let parse = |var: &'static str, target: &mut f64| -> Result<(), ConfigError> {
            if let Some(value) = lookup(var) {
                *target = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Env { var, value })?;
            }
            Ok(())
        };
        parse("ADVISOR_SAMPLE_RATE", &mut config.sample_rate)?;
        parse("ADVISOR_SLOW_QUERY_MS", &mut config.thresholds.slow_query_ms)?;
        parse("ADVISOR_HIGH_READ_UNITS", &mut config.thresholds.high_read_units)?;
        parse("ADVISOR_HIGH_WRITE_UNITS", &mut config.thresholds.high_write_units)?;

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on setup mistakes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite() || !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }

        let thresholds = [
            ("slowQueryMs", self.thresholds.slow_query_ms),
            ("highReadUnits", self.thresholds.high_read_units),
            ("highWriteUnits", self.thresholds.high_write_units),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if let Some(baseline) = &self.capacity_baseline {
            let values = [
                ("readUnitsPerSecond", baseline.read_units_per_second),
                ("writeUnitsPerSecond", baseline.write_units_per_second),
            ];
            for (name, value) in values {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::InvalidBaseline { name, value });
                }
            }
        }

        let prices = [
            ("onDemandReadPerMillion", self.pricing.on_demand_read_per_million),
            ("onDemandWritePerMillion", self.pricing.on_demand_write_per_million),
            ("provisionedReadPerUnitHour", self.pricing.provisioned_read_per_unit_hour),
            ("provisionedWritePerUnitHour", self.pricing.provisioned_write_per_unit_hour),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPricing { name, value });
            }
        }

        Ok(())
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`AdvisorConfig`]; `build` validates
#[derive(Debug, Clone, Default)]
pub struct AdvisorConfigBuilder {
    config: AdvisorConfig,
}

impl AdvisorConfigBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.config.sample_rate = rate;
        self
    }

    pub fn slow_query_ms(mut self, ms: f64) -> Self {
        self.config.thresholds.slow_query_ms = ms;
        self
    }

    pub fn high_read_units(mut self, units: f64) -> Self {
        self.config.thresholds.high_read_units = units;
        self
    }

    pub fn high_write_units(mut self, units: f64) -> Self {
        self.config.thresholds.high_write_units = units;
        self
    }

    pub fn capacity_baseline(mut self, read_units_per_second: f64, write_units_per_second: f64) -> Self {
        self.config.capacity_baseline = Some(CapacityBaseline {
            read_units_per_second,
            write_units_per_second,
        });
        self
    }

    pub fn pricing(mut self, pricing: UnitPricing) -> Self {
        self.config.pricing = pricing;
        self
    }

    pub fn reference_clock(mut self, clock: ReferenceClock) -> Self {
        self.config.reference_clock = clock;
        self
    }

    pub fn known_index(mut self, table_name: impl Into<Name>, index_name: impl Into<Name>) -> Self {
        self.config
            .known_indexes
            .push(IndexRef::new(table_name, index_name));
        self
    }

    pub fn sampler_seed(mut self, seed: u64) -> Self {
        self.config.sampler_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<AdvisorConfig, ConfigError> {
        self.config.validate()?;
        info!(
            enabled = self.config.enabled,
            sample_rate = self.config.sample_rate,
            provisioned = self.config.capacity_baseline.is_some(),
            "advisor configuration built"
        );
        Ok(self.config)
    }
}
