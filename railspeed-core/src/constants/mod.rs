//! Constants for the railspeed core
//!
//! Every tunable number lives here with its unit in the name. Unit
//! conversions are exact or to the precision the display needs.
//!
//! Constants are grouped by domain:
//! - **Timing**: tick period and state machine timeouts
//! - **Units**: speed conversions and model scale ratios
//! - **Sensing**: geometry and filtering of the range sensors

/// Tick period and state machine timeouts.
pub mod timing;

/// Speed unit conversions and model scale ratios.
pub mod units;

/// Sensor geometry, filter depth and the no-reading sentinel.
pub mod sensing;

pub use timing::{CLEAR_TIMEOUT_MS, SECOND_SENSOR_TIMEOUT_MS, TICK_PERIOD_MS};
pub use units::{KMH_PER_MM_PER_MS, MI_PER_KM};
pub use sensing::{DEFAULT_SPACING_MM, FILTER_DEPTH, NO_READING_MM};
