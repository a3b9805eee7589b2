//! Moving-Average Filter for Range Samples
//!
//! ## Overview
//!
//! Time-of-flight range sensors jitter by a few millimetres from shot to
//! shot, and the edge of a passing car can produce a single wild reading.
//! [`SampleFilter`] smooths one channel by averaging its last `N` samples.
//!
//! ## Storage
//!
//! Samples live in a fixed-size `heapless::HistoryBuffer` that is filled
//! with zeros at construction, so the buffer is always full and the mean is
//! always taken over exactly `N` slots:
//!
//! ```text
//! SampleFilter<u32, 4> after pushing 40, 42:
//! ┌────┬────┬────┬────┐
//! │ 40 │ 42 │  0 │  0 │   mean = 82 / 4 = 20
//! └────┴────┴────┴────┘
//!          ↑
//!          next write (oldest slot)
//! ```
//!
//! ## Known Limitation
//!
//! Because unfilled slots count as zero, the first `N - 1` outputs are biased
//! low. For range sensors that only delays detection of a near object by a
//! few ticks after power-up, so the filter is left unprimed.
//!
//! ## Integer Arithmetic
//!
//! Integer samples are summed in a wider accumulator ([`Sample::Acc`]) and the
//! mean truncates toward zero, like integer division in the sample type.
//!
//! ```rust
//! use railspeed_core::SampleFilter;
//!
//! let mut filter = SampleFilter::<u32, 3>::new();
//! assert_eq!(filter.push(30), 10);
//! assert_eq!(filter.push(30), 20);
//! assert_eq!(filter.push(30), 30);
//! ```

use core::ops::{Add, Div};

use heapless::HistoryBuffer;

/// Numeric type that can be averaged by [`SampleFilter`]
pub trait Sample: Copy + Default {
    /// Accumulator wide enough to sum any number of samples the filter holds
    type Acc: Copy + Default + Add<Output = Self::Acc> + Div<Output = Self::Acc>;

    /// Promote a sample into the accumulator type
    fn widen(self) -> Self::Acc;

    /// Convert a mean back into the sample type
    fn narrow(acc: Self::Acc) -> Self;

    /// Express a sample count in the accumulator type
    fn count(n: usize) -> Self::Acc;
}

macro_rules! impl_sample {
    ($($sample:ty => $acc:ty),* $(,)?) => {
        $(
            impl Sample for $sample {
                type Acc = $acc;

                #[inline]
                fn widen(self) -> $acc {
                    self as $acc
                }

                #[inline]
                fn narrow(acc: $acc) -> Self {
                    acc as $sample
                }

                #[inline]
                fn count(n: usize) -> $acc {
                    n as $acc
                }
            }
        )*
    };
}

impl_sample! {
    u8 => u32,
    u16 => u32,
    u32 => u64,
    i16 => i32,
    i32 => i64,
    f32 => f32,
    f64 => f64,
}

/// Fixed-depth moving-average filter
///
/// `N` is the averaging depth and must be at least 1; `N = 0` fails to
/// compile.
#[derive(Clone)]
pub struct SampleFilter<T: Sample, const N: usize> {
    samples: HistoryBuffer<T, N>,
}

impl<T: Sample, const N: usize> SampleFilter<T, N> {
    const NONZERO_DEPTH: () = assert!(N > 0, "filter depth must be at least 1");

    /// Filter with every slot zeroed
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_DEPTH;

        Self {
            samples: HistoryBuffer::new_with(T::default()),
        }
    }

    /// Add a sample, dropping the oldest, and return the new mean
    pub fn push(&mut self, sample: T) -> T {
        self.samples.write(sample);
        self.value()
    }

    /// Current mean without adding a sample
    pub fn value(&self) -> T {
        let sum = self
            .samples
            .as_slice()
            .iter()
            .fold(T::Acc::default(), |acc, s| acc + s.widen());
        T::narrow(sum / T::count(N))
    }

    /// Averaging depth
    pub fn depth(&self) -> usize {
        N
    }

    /// Zero every slot, as at construction
    pub fn reset(&mut self) {
        self.samples.clear_with(T::default());
    }
}

impl<T: Sample, const N: usize> Default for SampleFilter<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
