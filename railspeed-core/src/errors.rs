//! Error Types for Sensor Bring-Up and Measurement
//!
//! ## Design Philosophy
//!
//! Errors here are small, `Copy` and heap-free so they can be returned from
//! the tick path and logged over RTT without allocation. Only `&'static str`
//! is used for messages.
//!
//! ## Where Errors Surface
//!
//! Hardware problems stay inside the sensor wrapper. They reach the caller
//! exactly once, from [`Speedometer::begin`](crate::Speedometer::begin).
//! After that, everything the sensors or the track can do wrong (missed
//! second detection, both sensors firing together, no reading) is absorbed
//! by the state machine and shows up only as a speed of zero.
//!
//! ```rust
//! use railspeed_core::{SensorError, SpeedometerError, Channel, InitStep};
//!
//! fn report(result: Result<(), SpeedometerError>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(SpeedometerError::ChannelInit { channel, error: SensorError::InitFailed { step } }) => {
//!             // Wiring or address problem on one board
//!             let _ = (channel, step);
//!         }
//!         Err(SpeedometerError::WindowMissing { channel }) => {
//!             // Configuration bug: call set_window before begin
//!             let _ = channel;
//!         }
//!         Err(_) => {}
//!     }
//! }
//! # report(Err(SpeedometerError::ChannelInit {
//! #     channel: Channel::A,
//! #     error: SensorError::InitFailed { step: InitStep::CheckPresent },
//! # }));
//! ```

use thiserror_no_std::Error;

use crate::sensor::{Channel, InitStep};

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Result type for speedometer operations
pub type SpeedometerResult<T> = Result<T, SpeedometerError>;

/// Errors raised by a range sensor or its chip driver
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// A step of the chip bring-up sequence failed
    #[error("sensor initialization failed at step {step}")]
    InitFailed {
        /// The step that reported failure
        step: InitStep,
    },

    /// A measurement is still in flight
    #[error("sensor busy: previous measurement not complete")]
    Busy,

    /// The bus transaction to the chip failed
    #[error("sensor bus transaction failed")]
    Bus,

    /// The chip has not produced a range yet
    #[error("no measurement available")]
    NotReady,
}

/// Errors raised by the speedometer itself
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedometerError {
    /// One channel's sensor failed to start
    #[error("channel {channel} failed to start: {error}")]
    ChannelInit {
        /// The failing channel
        channel: Channel,
        /// What went wrong
        error: SensorError,
    },

    /// No detection window was installed for a channel
    #[error("channel {channel} has no detection window")]
    WindowMissing {
        /// The channel without a window
        channel: Channel,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InitFailed { step } =>
                defmt::write!(fmt, "Init failed at {}", step.name()),
            Self::Busy =>
                defmt::write!(fmt, "Sensor busy"),
            Self::Bus =>
                defmt::write!(fmt, "Bus error"),
            Self::NotReady =>
                defmt::write!(fmt, "No measurement"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SpeedometerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ChannelInit { channel, error } =>
                defmt::write!(fmt, "Channel {} init: {}", channel, error),
            Self::WindowMissing { channel } =>
                defmt::write!(fmt, "Channel {} has no window", channel),
        }
    }
}
