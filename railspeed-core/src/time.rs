//! Time management for the measurement loop
//!
//! Provides the millisecond clock and the periodic tick gate:
//! - `TimeSource`: anything that can say what millisecond it is
//! - `MonotonicTime`: host clock, counted from construction (requires std)
//! - `FixedTime`: settable clock for tests and simulation
//! - `TickGate` / `PeriodicTick`: decides whether a cycle is due

use core::cell::Cell;

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Source of time for the system
///
/// Must be monotonic. Elapsed-time arithmetic saturates at zero, so a clock
/// that steps backwards stalls timeouts instead of wrapping them.
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Monotonic time source backed by the host clock
///
/// Starts at 0 on construction, always increases
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Fixed time source for testing
///
/// Interior mutability lets a test keep a shared reference while the
/// speedometer holds another, and still move time forward.
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Cell<Timestamp>,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: Cell::new(timestamp) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

/// Milliseconds from `earlier` to `later`, zero if the clock went backwards
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// Gate that decides whether a measurement cycle should run
///
/// The speedometer checks the gate before touching any state; a `false`
/// return leaves everything as it was.
pub trait TickGate {
    /// Return true if a tick period has elapsed as of `now`
    fn update(&mut self, now: Timestamp) -> bool;
}

/// Fixed-period tick gate
///
/// In real-time mode the next deadline is the previous deadline plus one
/// period, so the cycle rate does not drift with loop jitter. A caller that
/// falls more than one period behind is resynchronized to `now` rather than
/// replaying every missed tick.
#[derive(Debug, Clone)]
pub struct PeriodicTick {
    period_ms: u64,
    realtime: bool,
    next_due: Option<Timestamp>,
}

impl PeriodicTick {
    /// Real-time gate firing every `period_ms` milliseconds
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            realtime: true,
            next_due: None,
        }
    }

    /// Gate that measures each period from the moment it last fired
    pub fn free_running(period_ms: u64) -> Self {
        Self {
            realtime: false,
            ..Self::new(period_ms)
        }
    }

    /// Configured period
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }
}

impl TickGate for PeriodicTick {
    fn update(&mut self, now: Timestamp) -> bool {
        let due = match self.next_due {
            // First call always runs
            None => now,
            Some(due) => due,
        };
        if now < due {
            return false;
        }

        let next = if self.realtime && delta_ms(due, now) < self.period_ms {
            due + self.period_ms
        } else {
            now + self.period_ms
        };
        self.next_due = Some(next);
        true
    }
}
