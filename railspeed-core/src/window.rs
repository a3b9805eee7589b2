//! Band detector with hysteresis at both edges
//!
//! A [`RangeWindow`] answers "is the object at the distance we expect a
//! train to be?" The sensor looks across the track; the rails sit at a known
//! range, so anything much nearer is a hand or a wall, anything farther (or
//! [`NO_READING`](crate::NO_READING)) is empty track.
//!
//! Two Schmitt triggers share one hysteresis:
//!
//! ```text
//!              low edge              high edge
//!          (center - hwidth)     (center + hwidth)
//!                 │                     │
//!   low:  false ──┼──► true ─────────────────────────
//!   high: false ──────────────────────────┼──► true
//!                 │◄──── within() ───────►│
//! ```
//!
//! `within` is true while the low trigger is high and the high trigger is
//! still low. Each call updates both triggers, so a window is an active
//! detector with memory: evaluate it exactly once per fresh measurement, and
//! give each channel its own window.

use crate::trigger::SchmittTrigger;

/// Range band with hysteresis on both edges
#[derive(Debug, Clone)]
pub struct RangeWindow<T> {
    low: SchmittTrigger<T>,
    high: SchmittTrigger<T>,
}

impl<T: Copy + Into<i64>> RangeWindow<T> {
    /// Window centred on `center`, extending `hwidth` either side
    pub fn new(center: T, hwidth: T, hysteresis: T) -> Self {
        let center: i64 = center.into();
        let hwidth: i64 = hwidth.into();
        let hysteresis: i64 = hysteresis.into();

        Self {
            low: SchmittTrigger::from_wide(center.saturating_sub(hwidth), hysteresis, false),
            high: SchmittTrigger::from_wide(center.saturating_add(hwidth), hysteresis, false),
        }
    }

    /// Feed a reading; true if it lies inside the band
    pub fn within(&mut self, value: T) -> bool {
        let lo = self.low.evaluate(value);
        let hi = self.high.evaluate(value);
        lo && !hi
    }

    /// Reference of the near edge
    pub fn low_edge(&self) -> i64 {
        self.low.reference()
    }

    /// Reference of the far edge
    pub fn high_edge(&self) -> i64 {
        self.high.reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> RangeWindow<u32> {
        // Band 30..50 with ±2 dead band at each edge
        RangeWindow::new(40, 10, 2)
    }

    #[test]
    fn edges_from_center() {
        let w = window();
        assert_eq!(w.low_edge(), 30);
        assert_eq!(w.high_edge(), 50);
    }

    #[test]
    fn sharp_entry_and_exit() {
        let mut w = window();
        assert!(!w.within(10));
        assert!(w.within(40));
        assert!(!w.within(80));
        assert!(w.within(40));
        assert!(!w.within(10));
    }

    #[test]
    fn slow_approach_lags_at_low_edge() {
        let mut w = window();
        // Inside the dead band the low trigger has not switched yet
        assert!(!w.within(30));
        assert!(!w.within(32));
        assert!(w.within(33));
        // Backing out stays inside until below 28
        assert!(w.within(29));
        assert!(w.within(28));
        assert!(!w.within(27));
    }

    #[test]
    fn slow_departure_lags_at_high_edge() {
        let mut w = window();
        assert!(w.within(40));
        assert!(w.within(52));
        assert!(!w.within(53));
        // Coming back needs to drop below 48
        assert!(!w.within(49));
        assert!(!w.within(48));
        assert!(w.within(47));
    }

    #[test]
    fn no_reading_is_outside() {
        let mut w = window();
        assert!(w.within(40));
        assert!(!w.within(crate::NO_READING));
    }

    #[test]
    fn unsigned_window_near_zero() {
        let mut w = RangeWindow::new(3u8, 10, 1);
        assert_eq!(w.low_edge(), -7);
        assert!(w.within(0));
        assert!(w.within(12));
        assert!(!w.within(15));
    }

    #[test]
    fn edges_saturate_for_i64() {
        let mut low = RangeWindow::new(i64::MIN + 5, 10, 0);
        assert_eq!(low.low_edge(), i64::MIN);
        assert_eq!(low.high_edge(), i64::MIN + 15);
        assert!(low.within(i64::MIN + 10));
        assert!(!low.within(0));

        let mut high = RangeWindow::new(i64::MAX - 5, 10, 0);
        assert_eq!(high.high_edge(), i64::MAX);
        assert!(high.within(i64::MAX - 5));
        assert!(high.within(i64::MAX));
    }

    #[test]
    fn clones_are_independent() {
        let mut a = window();
        let mut b = a.clone();
        assert!(a.within(40));
        assert!(!b.within(10));
        assert!(a.within(40));
    }
}
