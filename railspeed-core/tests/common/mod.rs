//! Shared fixtures for the integration tests
//!
//! - `ScriptedSensor`: a `RangeSensor` whose range the test sets directly
//! - `SimChip`: a `RangeDriver` for exercising the real `FilteredSensor`
//! - `FlakyChip`: a `RangeDriver` that signals its own ready flag and can fail shots
//! - `SwitchGate`: a tick gate the test can hold closed
//! - `Rig`: two scripted sensors, a fixed clock and a speedometer

#![allow(dead_code)]

use core::cell::Cell;

use railspeed_core::{
    FixedTime, InitStep, RangeDriver, RangeSensor, RangeWindow, ReadyFlag, SensorError,
    SensorResult, Speedometer, SpeedometerConfig, TickGate, Timestamp, NO_READING,
};

/// Distance of a car passing over the sensor (mm)
pub const CAR_MM: u32 = 40;

/// Window used by every scenario: 25..55 mm with ±2 mm hysteresis
pub fn car_window() -> RangeWindow<u32> {
    RangeWindow::new(CAR_MM, 15, 2)
}

/// Sensor that completes instantly with whatever range the test sets
pub struct ScriptedSensor<'a> {
    range: &'a Cell<u32>,
    ready: bool,
    pub triggers: usize,
    pub reads: usize,
}

impl<'a> ScriptedSensor<'a> {
    pub fn new(range: &'a Cell<u32>) -> Self {
        Self {
            range,
            ready: false,
            triggers: 0,
            reads: 0,
        }
    }
}

impl RangeSensor for ScriptedSensor<'_> {
    fn begin(&mut self) -> SensorResult<()> {
        Ok(())
    }

    fn trigger(&mut self) -> nb::Result<(), SensorError> {
        self.triggers += 1;
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn get_distance(&mut self) -> u32 {
        self.reads += 1;
        self.range.get()
    }
}

/// Tick gate that is due whenever `open` is set
pub struct SwitchGate<'a> {
    open: &'a Cell<bool>,
    pub polls: usize,
}

impl<'a> SwitchGate<'a> {
    pub fn new(open: &'a Cell<bool>) -> Self {
        Self { open, polls: 0 }
    }
}

impl TickGate for SwitchGate<'_> {
    fn update(&mut self, _now: Timestamp) -> bool {
        self.polls += 1;
        self.open.get()
    }
}

/// Ranging chip whose next range is set by the test
pub struct SimChip<'a> {
    range: &'a Cell<u32>,
    pub shots: usize,
}

impl<'a> SimChip<'a> {
    pub fn new(range: &'a Cell<u32>) -> Self {
        Self { range, shots: 0 }
    }
}

impl RangeDriver for SimChip<'_> {
    fn run_step(&mut self, _step: InitStep) -> SensorResult<()> {
        Ok(())
    }

    fn start_single_shot(&mut self) -> SensorResult<()> {
        self.shots += 1;
        Ok(())
    }

    fn read_range(&mut self) -> nb::Result<u32, SensorError> {
        match self.range.get() {
            NO_READING => Err(nb::Error::Other(SensorError::NotReady)),
            mm => Ok(mm),
        }
    }
}

/// Ranging chip that raises its own interrupt when a shot starts, and
/// fails the next `failures` shots with a bus error
pub struct FlakyChip<'a> {
    range: &'a Cell<u32>,
    ready: &'a ReadyFlag,
    pub failures: usize,
    pub shots: usize,
}

impl<'a> FlakyChip<'a> {
    pub fn new(range: &'a Cell<u32>, ready: &'a ReadyFlag, failures: usize) -> Self {
        Self {
            range,
            ready,
            failures,
            shots: 0,
        }
    }
}

impl RangeDriver for FlakyChip<'_> {
    fn run_step(&mut self, _step: InitStep) -> SensorResult<()> {
        Ok(())
    }

    fn start_single_shot(&mut self) -> SensorResult<()> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(SensorError::Bus);
        }
        self.shots += 1;
        self.ready.signal();
        Ok(())
    }

    fn read_range(&mut self) -> nb::Result<u32, SensorError> {
        match self.range.get() {
            NO_READING => Err(nb::Error::Other(SensorError::NotReady)),
            mm => Ok(mm),
        }
    }
}

/// Shared state the rig's parts borrow
pub struct Track {
    pub range_a: Cell<u32>,
    pub range_b: Cell<u32>,
    pub gate_open: Cell<bool>,
    pub clock: FixedTime,
}

impl Track {
    pub fn new() -> Self {
        Self {
            range_a: Cell::new(NO_READING),
            range_b: Cell::new(NO_READING),
            gate_open: Cell::new(true),
            clock: FixedTime::new(0),
        }
    }

    pub fn rig(&self, config: SpeedometerConfig) -> Rig<'_> {
        let mut speedo = Speedometer::new(
            ScriptedSensor::new(&self.range_a),
            ScriptedSensor::new(&self.range_b),
            SwitchGate::new(&self.gate_open),
            &self.clock,
            config,
        );
        speedo.set_window(car_window());
        Rig { track: self, speedo }
    }
}

pub type RigSpeedometer<'a> =
    Speedometer<ScriptedSensor<'a>, ScriptedSensor<'a>, SwitchGate<'a>, &'a FixedTime>;

/// Speedometer wired to scripted sensors on a `Track`
pub struct Rig<'a> {
    pub track: &'a Track,
    pub speedo: RigSpeedometer<'a>,
}

impl Rig<'_> {
    /// Put a car over (or remove it from) each sensor
    pub fn cars(&self, over_a: bool, over_b: bool) {
        let at = |over| if over { CAR_MM } else { NO_READING };
        self.track.range_a.set(at(over_a));
        self.track.range_b.set(at(over_b));
    }

    /// Run a trigger cycle and a collect cycle at `t_ms`
    pub fn sample_at(&mut self, t_ms: Timestamp) {
        self.track.clock.set(t_ms);
        assert!(self.speedo.update());
        assert!(self.speedo.update());
    }
}
