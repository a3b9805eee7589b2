//! Schmitt trigger on integer readings
//!
//! Reports whether a value is above a reference, with a dead band of
//! `±hysteresis` around the reference inside which the output holds its
//! last state:
//!
//! ```text
//!  state
//!  true  ─ ─ ─ ─ ─ ┌───────────────────
//!                  │         ▲
//!        ◄─────────┼─────────┘
//!  false ──────────┘ ─ ─ ─ ─ ─
//!             R-H  R  R+H          value
//! ```
//!
//! The reference, hysteresis and inputs are all promoted to `i64` before
//! comparing, so `R - H` cannot underflow for unsigned types and a `u32`
//! sentinel such as `u32::MAX` compares as the large positive number it is.
//! For `i64` itself the band edges saturate at the type's limits.

use core::marker::PhantomData;

/// Hysteresis threshold detector
#[derive(Debug, Clone)]
pub struct SchmittTrigger<T> {
    reference: i64,
    hysteresis: i64,
    state: bool,
    _value: PhantomData<T>,
}

impl<T: Copy + Into<i64>> SchmittTrigger<T> {
    /// Trigger starting low
    pub fn new(reference: T, hysteresis: T) -> Self {
        Self::with_state(reference, hysteresis, false)
    }

    /// Trigger starting in `initial`
    pub fn with_state(reference: T, hysteresis: T, initial: bool) -> Self {
        Self::from_wide(reference.into(), hysteresis.into(), initial)
    }

    /// Build from already-promoted values
    pub(crate) fn from_wide(reference: i64, hysteresis: i64, initial: bool) -> Self {
        Self {
            reference,
            hysteresis: hysteresis.saturating_abs(),
            state: initial,
            _value: PhantomData,
        }
    }

    /// Feed a value and return the (possibly updated) state
    ///
    /// Above `R + H` the state becomes true, below `R - H` it becomes false,
    /// and anywhere in `[R - H, R + H]` it is left alone.
    pub fn evaluate(&mut self, value: T) -> bool {
        let value: i64 = value.into();
        if value > self.reference.saturating_add(self.hysteresis) {
            self.state = true;
        } else if value < self.reference.saturating_sub(self.hysteresis) {
            self.state = false;
        }
        self.state
    }

    /// Current state without feeding a value
    pub fn state(&self) -> bool {
        self.state
    }

    /// Reference value, promoted
    pub fn reference(&self) -> i64 {
        self.reference
    }

    /// Half-width of the dead band, promoted
    pub fn hysteresis(&self) -> i64 {
        self.hysteresis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_low() {
        let trigger = SchmittTrigger::new(50u32, 5);
        assert!(!trigger.state());
    }

    #[test]
    fn switches_outside_dead_band() {
        let mut trigger = SchmittTrigger::new(50u32, 5);

        assert!(!trigger.evaluate(55));
        assert!(trigger.evaluate(56));
        assert!(trigger.evaluate(45));
        assert!(!trigger.evaluate(44));
    }

    #[test]
    fn holds_inside_dead_band() {
        let mut high = SchmittTrigger::with_state(50u32, 5, true);
        let mut low = SchmittTrigger::with_state(50u32, 5, false);

        for v in 45..=55 {
            assert!(high.evaluate(v));
            assert!(!low.evaluate(v));
        }
    }

    #[test]
    fn no_underflow_near_zero() {
        let mut trigger = SchmittTrigger::new(2u8, 5);
        assert_eq!(trigger.reference() - trigger.hysteresis(), -3);
        assert!(!trigger.evaluate(0));
        assert!(trigger.evaluate(8));
        assert!(trigger.evaluate(0));
    }

    #[test]
    fn sentinel_reads_as_far() {
        let mut trigger = SchmittTrigger::new(60u32, 4);
        assert!(trigger.evaluate(u32::MAX));
    }

    #[test]
    fn band_saturates_at_i64_limits() {
        let mut top = SchmittTrigger::new(i64::MAX, 1);
        assert!(!top.evaluate(0));
        assert!(!top.evaluate(i64::MAX));

        let mut bottom = SchmittTrigger::with_state(i64::MIN, 1, true);
        assert!(bottom.evaluate(0));
        assert!(bottom.evaluate(i64::MIN));

        let wide = SchmittTrigger::new(0i64, i64::MIN);
        assert_eq!(wide.hysteresis(), i64::MAX);
    }

    #[test]
    fn negative_hysteresis_normalized() {
        let trigger = SchmittTrigger::new(0i32, -3);
        assert_eq!(trigger.hysteresis(), 3);
    }
}
