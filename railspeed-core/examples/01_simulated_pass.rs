//! Simulated Train Pass
//!
//! Runs the speedometer against two simulated time-of-flight sensors while a
//! three-car train rolls past at a known speed, then prints the measured
//! scale speed next to the true one.
//!
//! ## What You'll Learn
//!
//! - Implementing `RangeDriver` for a ranging chip
//! - Signalling readiness through a `ReadyFlag`
//! - Driving the speedometer from a periodic tick
//! - Reading each speed exactly once
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_pass
//! ```

use std::cell::Cell;

use railspeed_core::{
    FilteredSensor, FixedTime, InitStep, RangeDriver, RangeWindow, ReadyFlag,
    Scale, SensorError, SensorResult, Speedometer, SpeedometerConfig, TimeSource, NO_READING,
};

/// Range to a car body from the sensor (mm)
const CAR_MM: u32 = 42;
/// Car length including coupler gap (mm)
const CAR_LEN_MM: f64 = 140.0;
const GAP_MM: f64 = 8.0;
const CARS: usize = 3;

/// Simulated train: position of the head as a function of time
struct Train {
    speed_mm_per_ms: f64,
    start_ms: f64,
}

impl Train {
    fn head_mm(&self, t_ms: u64) -> f64 {
        (t_ms as f64 - self.start_ms) * self.speed_mm_per_ms
    }

    /// True if some car body covers the track point at `x_mm`
    fn covers(&self, x_mm: f64, t_ms: u64) -> bool {
        let behind_head = self.head_mm(t_ms) - x_mm;
        if behind_head < 0.0 {
            return false;
        }
        let pitch = CAR_LEN_MM + GAP_MM;
        let car = (behind_head / pitch) as usize;
        car < CARS && behind_head - car as f64 * pitch < CAR_LEN_MM
    }
}

/// Ranging chip at `position_mm` along the track
struct SimChip<'a> {
    position_mm: f64,
    train: &'a Train,
    clock: &'a FixedTime,
    ready: &'static ReadyFlag,
    noise: Cell<u32>,
}

impl<'a> SimChip<'a> {
    fn new(
        position_mm: f64,
        train: &'a Train,
        clock: &'a FixedTime,
        ready: &'static ReadyFlag,
    ) -> Self {
        Self {
            position_mm,
            train,
            clock,
            ready,
            noise: Cell::new(7),
        }
    }

    /// Cheap ±2 mm jitter
    fn jitter(&self) -> u32 {
        let n = self.noise.get().wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.noise.set(n);
        (n >> 16) % 5
    }
}

impl RangeDriver for SimChip<'_> {
    fn run_step(&mut self, step: InitStep) -> SensorResult<()> {
        println!("  {:>6}: {}", self.position_mm, step);
        Ok(())
    }

    fn start_single_shot(&mut self) -> SensorResult<()> {
        // The chip raises its interrupt well inside one tick
        self.ready.signal();
        Ok(())
    }

    fn read_range(&mut self) -> nb::Result<u32, SensorError> {
        if self.train.covers(self.position_mm, self.clock.now()) {
            Ok(CAR_MM - 2 + self.jitter())
        } else {
            Ok(NO_READING)
        }
    }
}

static READY_A: ReadyFlag = ReadyFlag::new();
static READY_B: ReadyFlag = ReadyFlag::new();

fn main() {
    println!("Railspeed Simulated Pass");
    println!("========================\n");

    let config = SpeedometerConfig::for_scale(Scale::Jp);
    let spacing = config.spacing_mm as f64;

    // 0.35 mm/ms is 189 scale km/h at 1:150
    let train = Train {
        speed_mm_per_ms: 0.35,
        start_ms: 200.0,
    };
    let true_kmh = train.speed_mm_per_ms * config.scale.ratio() as f64 * 3.6;

    let clock = FixedTime::new(0);

    println!("Initializing sensors:");
    let mut speedo = Speedometer::new(
        FilteredSensor::<_, 10>::new(SimChip::new(0.0, &train, &clock, &READY_A), &READY_A),
        FilteredSensor::<_, 10>::new(SimChip::new(spacing, &train, &clock, &READY_B), &READY_B),
        config.tick_gate(),
        &clock,
        config,
    );
    speedo.set_window(RangeWindow::new(CAR_MM, 12, 3));

    if let Err(e) = speedo.begin() {
        eprintln!("Sensor start failed: {e}");
        return;
    }
    println!();

    let mut last_state = speedo.state();
    for t in 0..6_000 {
        clock.set(t);
        if !speedo.update() {
            continue;
        }

        if speedo.state() != last_state {
            println!("  t={t:5}ms  {:?} -> {:?}", last_state, speedo.state());
            last_state = speedo.state();
        }

        if speedo.is_updated() {
            let measured = speedo.get_speed();
            println!();
            println!("Measured speed: {measured:.1} km/h");
            println!("True speed:     {true_kmh:.1} km/h");
            println!("Error:          {:.1}%\n", (measured - true_kmh) / true_kmh * 100.0);
        }
    }

    println!("Final state: {:?}", speedo.state());
}
