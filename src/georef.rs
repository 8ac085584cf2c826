//! Maps an image's pixel grid onto ground distance

use crate::error::{Error, Result};
use crate::geometry;
use crate::metadata::ImageMetadata;
use crate::types::{PixelPoint, Polygon};

/// Per-axis ground sample distance resolved from an image's projected
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georeference {
    /// Meters of ground per pixel along x
    pub gsd_x: f64,
    /// Meters of ground per pixel along y
    pub gsd_y: f64,
}

impl Georeference {
    /// 1:1 pixel-to-meter resolution, the degraded fallback when an image
    /// carries no georeference.
    pub fn identity() -> Self {
        Self {
            gsd_x: 1.0,
            gsd_y: 1.0,
        }
    }

    /// Resolves the ground sample distance from image metadata.
    ///
    /// Fails with `GeoreferenceMissing` when either the CRS or the ground
    /// bounds are absent; callers degrade to [`Georeference::identity`]
    /// rather than surfacing the error to the user.
    pub fn resolve(metadata: &ImageMetadata) -> Result<Self> {
        match (&metadata.crs, &metadata.bounds) {
            (Some(_), Some(bounds)) => Ok(Self {
                gsd_x: bounds.width_m() / metadata.width as f64,
                gsd_y: bounds.height_m() / metadata.height as f64,
            }),
            _ => Err(Error::GeoreferenceMissing),
        }
    }

    /// Area under the nadir projection assumption.
    ///
    /// Exact for true orthographic imagery, an approximation for oblique
    /// captures; the corrector accounts for the difference.
    pub fn apparent_area_m2(&self, pixel_area: f64) -> f64 {
        pixel_area * self.gsd_x * self.gsd_y
    }

    /// Ring perimeter in meters, scaling each edge per axis before taking
    /// its length
    pub fn perimeter_m(&self, polygon: &Polygon) -> f64 {
        polygon
            .edges()
            .map(|(a, b)| geometry::vertex_distance(self.to_ground(a), self.to_ground(b)))
            .sum()
    }

    fn to_ground(&self, p: PixelPoint) -> PixelPoint {
        PixelPoint::new(p.x * self.gsd_x, p.y * self.gsd_y)
    }
}
