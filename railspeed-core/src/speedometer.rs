//! Two-sensor transit speedometer
//!
//! ## Measurement Cycle
//!
//! The speedometer is polled from the main loop. Each call to
//! [`Speedometer::update`] first asks the tick gate whether a period has
//! elapsed; if not, it returns `false` without touching any state. When a
//! tick is due it alternates between two phases:
//!
//! 1. **Trigger**: fire both emitters and mark the cycle triggered. If
//!    either shot fails to start, the cycle stays untriggered and the next
//!    tick fires again.
//! 2. **Collect**: once *both* sensors report ready, read both filtered
//!    ranges and run each through its channel's [`RangeWindow`] to get this
//!    cycle's detections.
//!
//! The state machine ([`crate::transit`]) runs on every due tick, using the
//! most recent detections even if this tick didn't produce new ones, so the
//! timeouts keep running while a sensor is slow.
//!
//! ## Reading the Result
//!
//! A finished measurement sets an update-pending flag. [`Speedometer::is_updated`]
//! returns it once and clears it; [`Speedometer::get_speed`] returns the speed
//! and also clears it. The state machine holds in `Updated` until one of
//! them has been called, so a display loop never misses a reading.

use crate::config::{Scale, SpeedometerConfig, Units};
use crate::errors::{SensorError, SpeedometerError, SpeedometerResult};
use crate::sensor::{Channel, RangeSensor};
use crate::time::{delta_ms, TickGate, TimeSource, Timestamp};
use crate::transit::{transition, Action, Detections, TransitState};
use crate::window::RangeWindow;

/// Output asserted while one sensor has fired and the other hasn't
///
/// Typically the board LED.
pub trait Indicator {
    /// Drive the output
    fn set(&mut self, on: bool);
}

/// Indicator that goes nowhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn set(&mut self, _on: bool) {}
}

impl<I: Indicator + ?Sized> Indicator for &mut I {
    fn set(&mut self, on: bool) {
        (**self).set(on)
    }
}

/// Transit timer driving two range sensors
///
/// - `A`, `B`: the two sensing points
/// - `G`: tick gate deciding when a cycle is due
/// - `C`: millisecond clock
/// - `L`: partial-detection indicator
pub struct Speedometer<A, B, G, C, L = NoIndicator> {
    sensor_a: A,
    sensor_b: B,
    gate: G,
    clock: C,
    indicator: L,
    config: SpeedometerConfig,
    window_a: Option<RangeWindow<u32>>,
    window_b: Option<RangeWindow<u32>>,
    state: TransitState,
    /// Start of the open interval, or of the clear timeout
    mark: Timestamp,
    speed: f64,
    updated: bool,
    detections: Detections,
    triggered: bool,
}

impl<A, B, G, C> Speedometer<A, B, G, C, NoIndicator>
where
    A: RangeSensor,
    B: RangeSensor,
    G: TickGate,
    C: TimeSource,
{
    /// Speedometer with no indicator and no detection windows yet
    pub fn new(sensor_a: A, sensor_b: B, gate: G, clock: C, config: SpeedometerConfig) -> Self {
        Self {
            sensor_a,
            sensor_b,
            gate,
            clock,
            indicator: NoIndicator,
            config,
            window_a: None,
            window_b: None,
            state: TransitState::Clear,
            mark: 0,
            speed: 0.0,
            updated: false,
            detections: Detections::default(),
            triggered: false,
        }
    }
}

impl<A, B, G, C, L> Speedometer<A, B, G, C, L>
where
    A: RangeSensor,
    B: RangeSensor,
    G: TickGate,
    C: TimeSource,
    L: Indicator,
{
    /// Drive `indicator` while a partial detection is in progress
    pub fn with_indicator<L2: Indicator>(self, indicator: L2) -> Speedometer<A, B, G, C, L2> {
        Speedometer {
            sensor_a: self.sensor_a,
            sensor_b: self.sensor_b,
            gate: self.gate,
            clock: self.clock,
            indicator,
            config: self.config,
            window_a: self.window_a,
            window_b: self.window_b,
            state: self.state,
            mark: self.mark,
            speed: self.speed,
            updated: self.updated,
            detections: self.detections,
            triggered: self.triggered,
        }
    }

    /// Bring up both sensors
    ///
    /// Both channels are always attempted so the log shows every fault; the
    /// first failure is returned. A channel without a detection window is
    /// also reported here.
    pub fn begin(&mut self) -> SpeedometerResult<()> {
        let result_a = self.sensor_a.begin();
        let result_b = self.sensor_b.begin();

        for (channel, result) in [(Channel::A, result_a), (Channel::B, result_b)] {
            if let Err(error) = result {
                log_warn!("Sensor {} failed to start: {:?}", channel, error);
            }
        }
        start_result(Channel::A, result_a)?;
        start_result(Channel::B, result_b)?;

        if self.window_a.is_none() {
            return Err(SpeedometerError::WindowMissing { channel: Channel::A });
        }
        if self.window_b.is_none() {
            return Err(SpeedometerError::WindowMissing { channel: Channel::B });
        }

        log_info!(
            "Speedometer started: 1:{} scale, {} mm spacing",
            self.config.scale.ratio(),
            self.config.spacing_mm
        );
        Ok(())
    }

    /// Run one cycle if the tick gate says it is due
    ///
    /// Returns `true` if the cycle ran. When the gate is not due nothing is
    /// mutated.
    pub fn update(&mut self) -> bool {
        let now = self.clock.now();
        if !self.gate.update(now) {
            return false;
        }

        self.measure();

        let elapsed = delta_ms(self.mark, now);
        let step = transition(self.state, self.detections, elapsed, self.updated, &self.config);
        self.apply(step.action, now);

        if step.next != self.state {
            log_debug!("{} ms: {:?} -> {:?}", now, self.state, step.next);
            self.state = step.next;
        }

        self.indicator.set(self.state.is_partial());
        true
    }

    /// Trigger or collect, alternating by cycle
    fn measure(&mut self) {
        if !self.triggered {
            let started_a = fire(Channel::A, &mut self.sensor_a);
            let started_b = fire(Channel::B, &mut self.sensor_b);
            // A failed shot will never signal ready; retrigger next tick
            self.triggered = started_a && started_b;
        } else if self.sensor_a.is_ready() && self.sensor_b.is_ready() {
            self.triggered = false;
            let dist_a = self.sensor_a.get_distance();
            let dist_b = self.sensor_b.get_distance();
            self.detections = Detections::new(
                detect(&mut self.window_a, dist_a),
                detect(&mut self.window_b, dist_b),
            );
            log_trace!(
                "det {} {} dist {} {}",
                self.detections.a,
                self.detections.b,
                dist_a,
                dist_b
            );
        }
    }

    fn apply(&mut self, action: Action, now: Timestamp) {
        match action {
            Action::None => {}
            Action::StartInterval | Action::StartSettle => self.mark = now,
            Action::Measure { elapsed_ms } => {
                self.speed = self.config.scale_speed(elapsed_ms).unwrap_or(0.0);
                self.updated = true;
                self.mark = now;
                log_info!("Transit {} ms, speed {}", elapsed_ms, self.speed);
            }
            Action::Abandon => {
                self.speed = 0.0;
                log_debug!("{} ms: interval abandoned", now);
            }
        }
    }

    /// Change the model scale
    pub fn set_scale(&mut self, scale: Scale) {
        self.config.scale = scale;
    }

    /// Choose km/h (`true`) or mph (`false`)
    pub fn set_metric(&mut self, metric: bool) {
        self.config.units = Units::from_metric(metric);
    }

    /// Install the same detection window on both channels
    ///
    /// Each channel gets its own copy, so the two hysteresis states never
    /// interfere.
    pub fn set_window(&mut self, window: RangeWindow<u32>) {
        self.window_a = Some(window.clone());
        self.window_b = Some(window);
    }

    /// Install a detection window on one channel
    pub fn set_window_for(&mut self, channel: Channel, window: RangeWindow<u32>) {
        match channel {
            Channel::A => self.window_a = Some(window),
            Channel::B => self.window_b = Some(window),
        }
    }

    /// True exactly once per new measurement
    pub fn is_updated(&mut self) -> bool {
        core::mem::take(&mut self.updated)
    }

    /// Last measured speed in the configured units; clears the update flag
    pub fn get_speed(&mut self) -> f64 {
        self.updated = false;
        self.speed
    }

    /// Scale speed for a transit time, `None` for zero
    pub fn calc_scale_speed(&self, elapsed_ms: u64) -> Option<f64> {
        self.config.scale_speed(elapsed_ms)
    }

    /// Current state machine state
    pub fn state(&self) -> TransitState {
        self.state
    }

    /// Detections from the last collected cycle
    pub fn detections(&self) -> Detections {
        self.detections
    }

    /// Whether the indicator is currently asserted
    pub fn indicator_on(&self) -> bool {
        self.state.is_partial()
    }

    /// Active configuration
    pub fn config(&self) -> &SpeedometerConfig {
        &self.config
    }

    /// Borrow both sensors
    pub fn sensors_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.sensor_a, &mut self.sensor_b)
    }
}

fn start_result(channel: Channel, result: Result<(), SensorError>) -> SpeedometerResult<()> {
    result.map_err(|error| SpeedometerError::ChannelInit { channel, error })
}

/// Trigger one channel; false if no measurement is running afterwards
fn fire<S: RangeSensor>(channel: Channel, sensor: &mut S) -> bool {
    match sensor.trigger() {
        Ok(()) => true,
        Err(nb::Error::WouldBlock) => {
            log_trace!("Sensor {} still busy", channel);
            true
        }
        Err(nb::Error::Other(error)) => {
            log_warn!("Sensor {} trigger failed: {:?}", channel, error);
            false
        }
    }
}

fn detect(window: &mut Option<RangeWindow<u32>>, distance: u32) -> bool {
    window.as_mut().map_or(false, |w| w.within(distance))
}
