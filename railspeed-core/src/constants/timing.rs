//! Timing Constants
//!
//! All values are milliseconds of the monotonic clock that feeds the
//! state machine.

/// Real-time tick period of the measurement cycle (milliseconds).
///
/// One cycle triggers both emitters, the next collects both ranges, so a
/// full measurement takes two ticks. The ranging chip converges in under
/// 8 ms at the configured maximum convergence time, which the two-tick
/// cycle covers.
pub const TICK_PERIOD_MS: u64 = 5;

/// How long to wait for the second sensor after the first one detects
/// (milliseconds).
///
/// With 127 mm spacing this is the transit time of a 1:160 model at
/// 1 scale mph; anything slower is treated as stalled or reversed and
/// the interval is abandoned.
pub const SECOND_SENSOR_TIMEOUT_MS: u64 = 45_455;

/// Settle time after both sensors clear before the next train can be timed
/// (milliseconds).
///
/// Gaps between coupled cars read as brief clears; 1.5 s bridges them.
pub const CLEAR_TIMEOUT_MS: u64 = 1_500;
