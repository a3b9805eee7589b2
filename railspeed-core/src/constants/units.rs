//! Speed Unit Constants

/// Statute miles per kilometre.
pub const MI_PER_KM: f64 = 0.621_371_192_24;

/// km/h per mm/ms.
///
/// 1 mm/ms = 1 m/s = 3.6 km/h.
pub const KMH_PER_MM_PER_MS: f64 = 3.6;

/// British N gauge ratio.
pub const SCALE_UK_N: u16 = 148;

/// Japanese N gauge ratio.
pub const SCALE_JP_N: u16 = 150;

/// US and European N gauge ratio.
pub const SCALE_US_N: u16 = 160;

/// HO gauge ratio.
pub const SCALE_HO: u16 = 87;
