//! Transit timing core for a two-sensor model railway speedometer
//!
//! Two proximity sensors sit a fixed distance apart along the track. Each
//! tick, both sensors are triggered, their filtered ranges are run through a
//! hysteresis window, and a six-state machine times the gap between the first
//! and second detection. That gap becomes a scale speed.
//!
//! Key constraints:
//! - Runs on a microcontroller with no heap
//! - Never blocks: sensors report readiness through interrupt-set flags
//! - Noisy readings must not produce phantom or doubled detections
//!
//! ```no_run
//! use railspeed_core::{
//!     FilteredSensor, FixedTime, RangeWindow, ReadyFlag,
//!     Speedometer, SpeedometerConfig,
//! };
//! # use railspeed_core::{InitStep, RangeDriver, SensorResult};
//! # struct Chip;
//! # impl RangeDriver for Chip {
//! #     fn run_step(&mut self, _: InitStep) -> SensorResult<()> { Ok(()) }
//! #     fn start_single_shot(&mut self) -> SensorResult<()> { Ok(()) }
//! #     fn read_range(&mut self) -> nb::Result<u32, railspeed_core::SensorError> { Ok(40) }
//! # }
//!
//! static READY_A: ReadyFlag = ReadyFlag::new();
//! static READY_B: ReadyFlag = ReadyFlag::new();
//!
//! let clock = FixedTime::new(0);
//! let config = SpeedometerConfig::default();
//! let mut speedo = Speedometer::new(
//!     FilteredSensor::<_, 10>::new(Chip, &READY_A),
//!     FilteredSensor::<_, 10>::new(Chip, &READY_B),
//!     config.tick_gate(),
//!     &clock,
//!     config,
//! );
//! speedo.set_window(RangeWindow::new(40u32, 15, 3));
//! speedo.begin().expect("sensors failed to start");
//!
//! loop {
//!     speedo.update();
//!     if speedo.is_updated() {
//!         let _kmh = speedo.get_speed();
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod sensor;
pub mod speedometer;
pub mod time;
pub mod transit;
pub mod trigger;
pub mod window;

// Public API
pub use config::{Scale, SpeedometerConfig, Units};
pub use errors::{SensorError, SensorResult, SpeedometerError, SpeedometerResult};
pub use filter::{Sample, SampleFilter};
pub use sensor::{
    Channel, FilteredSensor, InitStep, RangeDriver, RangeSensor, ReadyFlag, NO_READING,
};
pub use speedometer::{Indicator, NoIndicator, Speedometer};
pub use time::{FixedTime, PeriodicTick, TickGate, TimeSource, Timestamp};
#[cfg(feature = "std")]
pub use time::MonotonicTime;
pub use transit::{Action, Detections, Transition, TransitState};
pub use trigger::SchmittTrigger;
pub use window::RangeWindow;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
