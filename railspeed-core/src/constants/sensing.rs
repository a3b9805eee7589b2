//! Sensor Geometry and Filtering

/// Distance between the two sensors along the track (millimetres).
///
/// Five inches, the pitch of the reference sensor board.
pub const DEFAULT_SPACING_MM: u32 = 127;

/// Moving-average depth applied to each sensor's ranges.
///
/// At two ticks per reading this averages over the last 100 ms.
pub const FILTER_DEPTH: usize = 10;

/// Distance reported when a sensor has no valid range (millimetres).
///
/// All ones, so it sits above any detection window.
pub const NO_READING_MM: u32 = u32::MAX;
