//! Range Sensor Channel: Ready Flag, Chip Bring-Up and Filtering
//!
//! ## Overview
//!
//! Each of the two sensing points is a time-of-flight ranging chip on the I²C
//! bus with its GPIO1 pin wired to an interrupt. A measurement goes:
//!
//! ```text
//! Tick N                 interrupt              Tick N+1
//!   │                        │                     │
//!   ├─ ready.clear()         │                     │
//!   ├─ start_single_shot ──► chip ranging ──► ready.signal()
//!   │                                              ├─ is_ready() == true
//!   │                                              └─ get_distance()
//!   │                                                   ├─ read_range()
//!   │                                                   └─ filter.push()
//! ```
//!
//! ## Interrupt Boundary
//!
//! The interrupt handler only ever calls [`ReadyFlag::signal`]. Everything
//! else, including clearing the flag, happens on the tick side inside
//! [`FilteredSensor`]. The flag is cleared *before* the next single shot is
//! started, so an interrupt that fires immediately after the start cannot be
//! wiped out by a late clear.
//!
//! ## Usage
//!
//! ```rust
//! use railspeed_core::{FilteredSensor, RangeSensor, ReadyFlag, NO_READING};
//! # use railspeed_core::{InitStep, RangeDriver, SensorResult, SensorError};
//! # struct Chip;
//! # impl RangeDriver for Chip {
//! #     fn run_step(&mut self, _: InitStep) -> SensorResult<()> { Ok(()) }
//! #     fn start_single_shot(&mut self) -> SensorResult<()> { Ok(()) }
//! #     fn read_range(&mut self) -> nb::Result<u32, SensorError> { Ok(42) }
//! # }
//!
//! static READY: ReadyFlag = ReadyFlag::new();
//!
//! // In the GPIO interrupt handler:
//! fn on_gpio1_rising() {
//!     READY.signal();
//! }
//!
//! let mut sensor = FilteredSensor::<_, 1>::new(Chip, &READY);
//! sensor.begin().unwrap();
//! sensor.trigger().unwrap();
//! assert_eq!(sensor.get_distance(), NO_READING);
//!
//! on_gpio1_rising();
//! assert!(sensor.is_ready());
//! assert_eq!(sensor.get_distance(), 42);
//! ```

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::constants::NO_READING_MM;
use crate::errors::{SensorError, SensorResult};
use crate::filter::SampleFilter;

/// Distance reported when no valid range is available
pub const NO_READING: u32 = NO_READING_MM;

/// One of the two sensing points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// First sensor in the direction of travel for eastbound trains
    A,
    /// Second sensor for eastbound trains
    B,
}

impl Channel {
    /// The opposite channel
    pub fn other(self) -> Self {
        match self {
            Channel::A => Channel::B,
            Channel::B => Channel::A,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::A => f.write_str("A"),
            Channel::B => f.write_str("B"),
        }
    }
}

/// Measurement-complete flag shared with an interrupt handler
///
/// Single writer (the interrupt, which only sets it) and single reader (the
/// tick logic, which is also the only code that clears it). No lock is
/// needed; `Release` on set pairs with `Acquire` on read so the chip's
/// result registers are visible once the flag is seen.
#[derive(Debug)]
pub struct ReadyFlag(AtomicBool);

impl ReadyFlag {
    /// Cleared flag, usable in a `static`
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark a measurement complete. Called from interrupt context.
    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Has a measurement completed since the last clear?
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for ReadyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// One step of the ranging chip bring-up, in the order they are run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// Raise the chip-enable pin and wait for boot
    PowerOn,
    /// Move the chip from the default I²C address to its own
    AssignAddress,
    /// Read the model ID to confirm the chip answers
    CheckPresent,
    /// Load the recommended register settings
    Prepare,
    /// Route GPIO1 as the interrupt output
    ConfigureInterruptPin,
    /// Raise the interrupt when a new range sample is ready
    InterruptOnNewSample,
    /// Cap convergence time at 8 ms so a shot fits in one tick pair
    MaxConvergenceTime,
    /// Turn off the chip's own range-ignore filter
    DisableRangeFilter,
    /// Turn off DMax ambient-light estimation
    DisableDMax,
}

impl InitStep {
    /// Every step, in execution order
    pub const SEQUENCE: [InitStep; 9] = [
        InitStep::PowerOn,
        InitStep::AssignAddress,
        InitStep::CheckPresent,
        InitStep::Prepare,
        InitStep::ConfigureInterruptPin,
        InitStep::InterruptOnNewSample,
        InitStep::MaxConvergenceTime,
        InitStep::DisableRangeFilter,
        InitStep::DisableDMax,
    ];

    /// Maximum convergence time programmed by [`InitStep::MaxConvergenceTime`]
    pub const MAX_CONVERGENCE_MS: u8 = 8;

    /// Short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            InitStep::PowerOn => "power on",
            InitStep::AssignAddress => "assign address",
            InitStep::CheckPresent => "check presence",
            InitStep::Prepare => "prepare",
            InitStep::ConfigureInterruptPin => "configure interrupt pin",
            InitStep::InterruptOnNewSample => "interrupt on new sample",
            InitStep::MaxConvergenceTime => "max convergence time",
            InitStep::DisableRangeFilter => "disable range filter",
            InitStep::DisableDMax => "disable dmax",
        }
    }
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register-level driver for one ranging chip
///
/// Implemented outside this crate on top of the board's I²C bus. None of the
/// methods may block.
pub trait RangeDriver {
    /// Perform one bring-up step
    fn run_step(&mut self, step: InitStep) -> SensorResult<()>;

    /// Start a single-shot range measurement
    fn start_single_shot(&mut self) -> SensorResult<()>;

    /// Fetch the completed range in millimetres
    ///
    /// `WouldBlock` if the chip has no result yet; `Other` if the chip
    /// reports a ranging error (no target, overflow, ...).
    fn read_range(&mut self) -> nb::Result<u32, SensorError>;
}

/// Non-blocking range sensor as seen by the speedometer
pub trait RangeSensor {
    /// Bring the sensor up. Failure is fatal for the channel.
    fn begin(&mut self) -> SensorResult<()>;

    /// Start a measurement; `WouldBlock` while the previous one is in flight
    fn trigger(&mut self) -> nb::Result<(), SensorError>;

    /// Has a measurement completed since the last trigger?
    fn is_ready(&self) -> bool;

    /// Filtered distance in millimetres, or [`NO_READING`]
    fn get_distance(&mut self) -> u32;
}

/// Range sensor channel: chip driver + ready flag + moving-average filter
///
/// `N` is the filter depth; the speedometer firmware uses
/// [`FILTER_DEPTH`](crate::constants::FILTER_DEPTH).
pub struct FilteredSensor<'a, D, const N: usize> {
    driver: D,
    ready: &'a ReadyFlag,
    filter: SampleFilter<u32, N>,
    in_flight: bool,
    distance: u32,
}

impl<'a, D: RangeDriver, const N: usize> FilteredSensor<'a, D, N> {
    /// Wrap `driver`, whose interrupt sets `ready`
    pub fn new(driver: D, ready: &'a ReadyFlag) -> Self {
        Self {
            driver,
            ready,
            filter: SampleFilter::new(),
            in_flight: false,
            distance: NO_READING,
        }
    }

    /// Last distance returned by [`RangeSensor::get_distance`]
    pub fn last_distance(&self) -> u32 {
        self.distance
    }

    /// Borrow the chip driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutably borrow the chip driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<'a, D: RangeDriver, const N: usize> RangeSensor for FilteredSensor<'a, D, N> {
    fn begin(&mut self) -> SensorResult<()> {
        for step in InitStep::SEQUENCE {
            if let Err(error) = self.driver.run_step(step) {
                log_warn!("Range sensor bring-up failed at {}: {:?}", step.name(), error);
                return Err(SensorError::InitFailed { step });
            }
        }
        self.in_flight = false;
        self.distance = NO_READING;
        Ok(())
    }

    fn trigger(&mut self) -> nb::Result<(), SensorError> {
        if self.in_flight && !self.ready.is_set() {
            return Err(nb::Error::WouldBlock);
        }

        // Clear before starting so a fast completion can't be lost
        self.ready.clear();
        self.distance = NO_READING;
        self.driver.start_single_shot().map_err(nb::Error::Other)?;
        self.in_flight = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.is_set()
    }

    fn get_distance(&mut self) -> u32 {
        if !self.ready.is_set() {
            return NO_READING;
        }

        if self.in_flight {
            self.in_flight = false;
            self.distance = match self.driver.read_range() {
                // The sentinel bypasses the filter so it can't drag the mean
                Ok(mm) if mm != NO_READING => self.filter.push(mm),
                Ok(_) | Err(nb::Error::WouldBlock) => NO_READING,
                Err(nb::Error::Other(error)) => {
                    log_debug!("Range read failed: {:?}", error);
                    NO_READING
                }
            };
        }
        self.distance
    }
}
