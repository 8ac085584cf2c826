//! Application of the oblique-capture correction factor
//!
//! The factor itself comes from upstream (capture orientation, a reference
//! measurement, a calibration constant); this module only applies it and
//! fills in the bookkeeping fields of the result record.

use serde::Serialize;

/// Outcome of one area measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaResult {
    /// Area in square pixels
    pub pixel_area: f64,
    /// Area under the nadir projection assumption
    pub apparent_area_m2: f64,
    /// Apparent area scaled by the correction factor
    pub corrected_area_m2: f64,
    /// The factor that was applied (1 when none was usable)
    pub correction_factor: f64,
    /// Whether a usable factor actually changed the measurement
    pub correction_applied: bool,
    /// Corrected minus apparent area
    pub area_difference_m2: f64,
    /// Difference relative to the apparent area, in percent; 0 when the
    /// apparent area is 0
    pub area_difference_percent: f64,
}

/// Scales an apparent area by a correction factor.
///
/// Factors that are not finite and positive are unusable and the apparent
/// area passes through with factor 1. A zero apparent area can never be
/// corrected meaningfully: the difference percent and the applied flag are
/// forced to 0 so the division by the apparent area never runs.
pub fn apply(pixel_area: f64, apparent_area_m2: f64, factor: Option<f64>) -> AreaResult {
    let factor = match factor {
        Some(f) if f.is_finite() && f > 0.0 => f,
        _ => 1.0,
    };

    if apparent_area_m2 <= 0.0 {
        return AreaResult {
            pixel_area,
            apparent_area_m2,
            corrected_area_m2: apparent_area_m2,
            correction_factor: factor,
            correction_applied: false,
            area_difference_m2: 0.0,
            area_difference_percent: 0.0,
        };
    }

    let corrected_area_m2 = apparent_area_m2 * factor;
    let area_difference_m2 = corrected_area_m2 - apparent_area_m2;

    AreaResult {
        pixel_area,
        apparent_area_m2,
        corrected_area_m2,
        correction_factor: factor,
        correction_applied: factor != 1.0,
        area_difference_m2,
        area_difference_percent: area_difference_m2 / apparent_area_m2 * 100.0,
    }
}
