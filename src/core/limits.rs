/*!
 * Detector Limits and Constants
 *
 * Centralized location for all thresholds, windows, and store limits used by
 * the detector catalogue. Organized by detector.
 *
 * - Store-imposed limits are marked with [STORE]
 * - Values that suppress false positives on small samples are marked with [SAMPLE]
 */

// =============================================================================
// SHARED
// =============================================================================

/// Minimum qualifying operations per group before most detectors fire
/// [SAMPLE]
pub const MIN_GROUP_SAMPLES: usize = 3;

/// Minimum key samples per group for statistical key-pattern detection
/// [SAMPLE]
pub const KEY_PATTERN_MIN_SAMPLES: usize = 20;

/// Milliseconds per second
pub const MS_PER_SECOND: u64 = 1_000;

/// Milliseconds per day
pub const MS_PER_DAY: u64 = 24 * 60 * 60 * MS_PER_SECOND;

// =============================================================================
// HOT PARTITION
// =============================================================================

/// Share of scope traffic above which a partition key is hot
pub const HOT_PARTITION_SHARE: f64 = 0.10;

/// Share of scope traffic at which a hot partition escalates to error
pub const HOT_PARTITION_ERROR_SHARE: f64 = 0.50;

/// Minimum keyed operations in a scope before shares are meaningful
/// [SAMPLE]
pub const HOT_PARTITION_MIN_OPERATIONS: usize = 10;

// =============================================================================
// SCAN / FILTER EFFICIENCY
// =============================================================================

/// Average efficiency below which a group is flagged as warning
pub const SCAN_EFFICIENCY_WARNING: f64 = 0.20;

/// Average efficiency below which a group is flagged as info
pub const SCAN_EFFICIENCY_INFO: f64 = 0.50;

// =============================================================================
// BATCH OPPORTUNITY
// =============================================================================

/// Maximum gap between consecutive operations in one cluster
pub const BATCH_WINDOW_MS: u64 = MS_PER_SECOND;

/// Minimum cluster size worth batching
/// [SAMPLE]
pub const BATCH_MIN_CLUSTER: usize = 3;

/// Items per batch write request
/// [STORE]
pub const BATCH_WRITE_LIMIT: usize = 25;

/// Keys per batch get request
/// [STORE]
pub const BATCH_GET_LIMIT: usize = 100;

// =============================================================================
// READ-BEFORE-WRITE
// =============================================================================

/// Maximum delay between a get and the put it precedes
pub const READ_BEFORE_WRITE_WINDOW_MS: u64 = 5 * MS_PER_SECOND;

/// Estimated reduction in operation count from in-place updates
pub const READ_BEFORE_WRITE_REDUCTION: f64 = 0.50;

// =============================================================================
// LARGE ITEM
// =============================================================================

/// Bytes per kilobyte
pub const KB: u64 = 1024;

/// Items above this size are reported as info
pub const LARGE_ITEM_INFO_BYTES: u64 = 100 * KB;

/// Items above this size are reported as warning
pub const LARGE_ITEM_WARNING_BYTES: u64 = 300 * KB;

/// Hard per-item size ceiling
/// [STORE]
pub const MAX_ITEM_BYTES: u64 = 400 * KB;

// =============================================================================
// KEY DISTRIBUTION
// =============================================================================

/// Fraction of increasing consecutive integer keys that marks a sequence
pub const SEQUENTIAL_KEY_RATIO: f64 = 0.50;

/// Fraction of values that must look temporal to flag a group
pub const TEMPORAL_KEY_RATIO: f64 = 0.50;

/// Earliest plausible epoch value (2000-01-01T00:00:00Z, seconds)
pub const EPOCH_SECONDS_MIN: i64 = 946_684_800;

/// Latest plausible epoch value (2100-01-01T00:00:00Z, seconds, exclusive)
pub const EPOCH_SECONDS_MAX: i64 = 4_102_444_800;

/// Delimiter used by concatenated key values
pub const KEY_DELIMITER: char = '#';

/// Minimum segments for a value to count as concatenated
pub const CONCATENATED_MIN_SEGMENTS: usize = 3;

/// Minimum varying positions before a composite key split is suggested
pub const CONCATENATED_MIN_VARYING: usize = 2;

// =============================================================================
// UNUSED INDEX
// =============================================================================

/// Idle period after which a secondary index is considered unused
pub const UNUSED_INDEX_MS: u64 = 7 * MS_PER_DAY;

// =============================================================================
// CAPACITY MODE
// =============================================================================

/// Utilization window length
pub const CAPACITY_WINDOW_MS: u64 = 60 * MS_PER_SECOND;

/// Minimum observed windows before capacity advice is given
/// [SAMPLE]
pub const CAPACITY_MIN_WINDOWS: u64 = 3;

/// Mean utilization below which provisioned capacity is wasted
pub const CAPACITY_LOW_UTILIZATION: f64 = 0.30;

/// Utilization above which throttling becomes likely
pub const CAPACITY_HIGH_UTILIZATION: f64 = 0.80;

/// Target utilization when sizing provisioned capacity
pub const CAPACITY_TARGET_UTILIZATION: f64 = 0.70;

/// Peak-to-mean ratio under which traffic counts as steady
pub const CAPACITY_STEADY_PEAK_RATIO: f64 = 1.5;

/// Billing month length used for cost estimates (30 days)
pub const SECONDS_PER_MONTH: f64 = 30.0 * 24.0 * 3600.0;

/// Billing month length in hours
pub const HOURS_PER_MONTH: f64 = 30.0 * 24.0;

// =============================================================================
// DEFAULT THRESHOLDS
// =============================================================================

/// Average latency above which an access pattern is slow
pub const DEFAULT_SLOW_QUERY_MS: f64 = 1_000.0;

/// Average read units per operation above which an access pattern is expensive
pub const DEFAULT_HIGH_READ_UNITS: f64 = 50.0;

/// Average write units per operation above which an access pattern is expensive
pub const DEFAULT_HIGH_WRITE_UNITS: f64 = 50.0;

// =============================================================================
// DEFAULT PRICING (USD)
// =============================================================================

/// On-demand price per million read units
pub const DEFAULT_ON_DEMAND_READ_PER_MILLION: f64 = 0.25;

/// On-demand price per million write units
pub const DEFAULT_ON_DEMAND_WRITE_PER_MILLION: f64 = 1.25;

/// Provisioned price per read unit-hour
pub const DEFAULT_PROVISIONED_READ_PER_HOUR: f64 = 0.000_13;

/// Provisioned price per write unit-hour
pub const DEFAULT_PROVISIONED_WRITE_PER_HOUR: f64 = 0.000_65;
