//! Correction-factor derivation from camera capture orientation

use crate::metadata::{CameraOrientation, ImageMetadata};

/// Degrees within which a capture still counts as perpendicular
pub const PERPENDICULAR_TOLERANCE_DEG: f64 = 5.0;

/// Derived factors are clamped to [1.0, this]
pub const MAX_CORRECTION_FACTOR: f64 = 3.0;

/// Whether the camera pointed straight down within tolerance.
/// Platforms record a pitch of -90 for a straight-down gimbal.
pub fn is_perpendicular(orientation: CameraOrientation) -> bool {
    let pitch_offset = (orientation.pitch_deg.abs() - 90.0).abs();
    pitch_offset <= PERPENDICULAR_TOLERANCE_DEG
        && orientation.roll_deg.abs() <= PERPENDICULAR_TOLERANCE_DEG
}

/// Derives the area correction factor for a capture orientation.
///
/// Perpendicular captures need none. Past 85 degrees of pitch only the roll
/// contributes; otherwise pitch and roll combine into one effective tilt
/// and the factor is the secant of that tilt, clamped to
/// [1.0, [`MAX_CORRECTION_FACTOR`]].
pub fn correction_factor(orientation: CameraOrientation) -> f64 {
    if is_perpendicular(orientation) {
        return 1.0;
    }

    let pitch = orientation.pitch_deg.abs();
    let roll_rad = orientation.roll_deg.abs().to_radians();

    let factor = if pitch > 85.0 {
        1.0 / roll_rad.cos()
    } else {
        let pitch_rad = pitch.to_radians();
        let effective = (pitch_rad * pitch_rad + roll_rad * roll_rad).sqrt();
        1.0 / effective.cos()
    };

    factor.min(MAX_CORRECTION_FACTOR).max(1.0)
}

/// Correction factor for an image, when one can be derived.
///
/// Recorded capture orientation drives the oblique factor. Without one, a
/// georeferenced image is taken as orthorectified, where the correction is
/// already baked into the pixels. Otherwise there is nothing to derive.
pub fn factor_for(metadata: &ImageMetadata) -> Option<f64> {
    if let Some(orientation) = metadata.camera {
        return Some(correction_factor(orientation));
    }
    if metadata.is_georeferenced() {
        return Some(1.0);
    }
    None
}
