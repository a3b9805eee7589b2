//! Speedometer configuration
//!
//! Everything that is fixed for a given layout: model scale, display units,
//! sensor spacing, tick period and the two state machine timeouts. Defaults
//! come from [`crate::constants`].
//!
//! With the `serde` feature a host tool can load a configuration from JSON:
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! use railspeed_core::{Scale, SpeedometerConfig, Units};
//!
//! let cfg: SpeedometerConfig = serde_json::from_str(r#"{
//!     "scale": "Us",
//!     "units": "Imperial",
//!     "spacing_mm": 100,
//!     "tick_period_ms": 5,
//!     "second_sensor_timeout_ms": 30000,
//!     "clear_timeout_ms": 1500
//! }"#).unwrap();
//! assert_eq!(cfg.scale, Scale::Us);
//! assert_eq!(cfg.units, Units::Imperial);
//! # }
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    units::{SCALE_HO, SCALE_JP_N, SCALE_UK_N, SCALE_US_N},
    CLEAR_TIMEOUT_MS, DEFAULT_SPACING_MM, MI_PER_KM, SECOND_SENSOR_TIMEOUT_MS, TICK_PERIOD_MS,
};
use crate::time::PeriodicTick;

/// Model scale, as the denominator of 1:N
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    /// British N, 1:148
    Uk,
    /// Japanese N, 1:150
    Jp,
    /// US and European N, 1:160
    Us,
    /// HO, 1:87
    Ho,
    /// Any other 1:N
    Custom(u16),
}

impl Scale {
    /// The N of 1:N
    pub fn ratio(self) -> u16 {
        match self {
            Scale::Uk => SCALE_UK_N,
            Scale::Jp => SCALE_JP_N,
            Scale::Us => SCALE_US_N,
            Scale::Ho => SCALE_HO,
            Scale::Custom(n) => n,
        }
    }

    /// Units customarily used with this scale
    pub fn customary_units(self) -> Units {
        match self {
            Scale::Jp => Units::Metric,
            _ => Units::Imperial,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Jp
    }
}

/// Display units for the scale speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Units {
    /// Kilometres per hour
    Metric,
    /// Miles per hour
    Imperial,
}

impl Units {
    /// From a "metric?" flag
    pub fn from_metric(metric: bool) -> Self {
        if metric {
            Units::Metric
        } else {
            Units::Imperial
        }
    }

    /// Factor applied to a km/h value
    pub fn per_kmh(self) -> f64 {
        match self {
            Units::Metric => 1.0,
            Units::Imperial => MI_PER_KM,
        }
    }
}

/// Fixed parameters of one speedometer installation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedometerConfig {
    /// Model scale
    pub scale: Scale,
    /// Display units
    pub units: Units,
    /// Distance between the sensors (mm)
    pub spacing_mm: u32,
    /// Period of the gate built by [`SpeedometerConfig::tick_gate`] (ms)
    pub tick_period_ms: u64,
    /// Give up on the second sensor after this long (ms)
    pub second_sensor_timeout_ms: u64,
    /// Quiet time before re-arming (ms)
    pub clear_timeout_ms: u64,
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self::for_scale(Scale::default())
    }
}

impl SpeedometerConfig {
    /// Defaults with `scale` and its customary units
    pub fn for_scale(scale: Scale) -> Self {
        Self {
            scale,
            units: scale.customary_units(),
            spacing_mm: DEFAULT_SPACING_MM,
            tick_period_ms: TICK_PERIOD_MS,
            second_sensor_timeout_ms: SECOND_SENSOR_TIMEOUT_MS,
            clear_timeout_ms: CLEAR_TIMEOUT_MS,
        }
    }

    /// Override the scale, keeping the current units
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Override the units
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Override the sensor spacing
    pub fn with_spacing_mm(mut self, spacing_mm: u32) -> Self {
        self.spacing_mm = spacing_mm;
        self
    }

    /// Override the tick period
    pub fn with_tick_period_ms(mut self, tick_period_ms: u64) -> Self {
        self.tick_period_ms = tick_period_ms;
        self
    }

    /// Override both timeouts
    pub fn with_timeouts(mut self, second_sensor_ms: u64, clear_ms: u64) -> Self {
        self.second_sensor_timeout_ms = second_sensor_ms;
        self.clear_timeout_ms = clear_ms;
        self
    }

    /// Real-time tick gate running at the configured period
    pub fn tick_gate(&self) -> PeriodicTick {
        PeriodicTick::new(self.tick_period_ms)
    }

    /// Scale speed for a transit of `elapsed_ms`, or `None` if `elapsed_ms`
    /// is zero
    ///
    /// `spacing / elapsed` is mm/ms, i.e. m/s; times 3.6 for km/h, times the
    /// scale ratio for the full-size equivalent, then into display units.
    pub fn scale_speed(&self, elapsed_ms: u64) -> Option<f64> {
        if elapsed_ms == 0 {
            return None;
        }
        let m_per_s = self.spacing_mm as f64 / elapsed_ms as f64;
        let kmh = m_per_s * self.scale.ratio() as f64 * crate::constants::KMH_PER_MM_PER_MS;
        Some(kmh * self.units.per_kmh())
    }
}
