//! The external segmentation capability

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry;
use crate::types::{PixelPoint, Polygon};

/// Capability that converts a clicked pixel into a candidate region
/// boundary.
///
/// Implementations wrap whatever model actually runs; the engine relies
/// only on this contract, treats every call as potentially slow, and never
/// retries on its own.
pub trait AutoDetector: Send + Sync {
    /// Returns the detected region boundary around a seed point, or
    /// `SegmentationFailure` when no usable region exists there.
    fn detect(&self, image_id: &str, seed: PixelPoint) -> Result<Polygon>;
}

/// Detector backed by pre-computed segmentations, one region set per image.
///
/// Stands in for the model in tests and demo deployments: the detection is
/// a lookup of the first stored region containing the seed point, which
/// keeps smart-mode responses deterministic.
pub struct FixtureDetector {
    regions: HashMap<String, Vec<Polygon>>,
}

impl FixtureDetector {
    /// A detector with no regions; every detection fails
    pub fn new() -> Self {
        Self {
            regions: HashMap::new(),
        }
    }

    /// Loads a fixture file mapping image identifiers to lists of region
    /// rings (`{"image": [[[x, y], ...], ...]}`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let parsed: HashMap<String, Vec<Vec<[f64; 2]>>> = serde_json::from_str(&raw)?;

        let mut detector = Self::new();
        for (image_id, rings) in parsed {
            for ring in rings {
                let polygon = Polygon::new(ring.into_iter().map(PixelPoint::from).collect())
                    .map_err(|e| Error::Catalog(format!("region for {}: {}", image_id, e)))?;
                detector.insert(&image_id, polygon);
            }
        }
        Ok(detector)
    }

    /// Registers a region for an image
    pub fn insert(&mut self, image_id: &str, region: Polygon) {
        self.regions
            .entry(image_id.to_string())
            .or_default()
            .push(region);
    }
}

impl Default for FixtureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoDetector for FixtureDetector {
    fn detect(&self, image_id: &str, seed: PixelPoint) -> Result<Polygon> {
        let regions = self.regions.get(image_id).ok_or_else(|| {
            Error::SegmentationFailure(format!("no segmentation available for {}", image_id))
        })?;

        regions
            .iter()
            .find(|region| geometry::contains_point(region, seed))
            .cloned()
            .ok_or_else(|| {
                Error::SegmentationFailure(format!(
                    "no region found at ({}, {})",
                    seed.x, seed.y
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ring(points: &[[f64; 2]]) -> Polygon {
        Polygon::new(points.iter().map(|&xy| PixelPoint::from(xy)).collect()).unwrap()
    }

    fn detector_with_two_regions() -> FixtureDetector {
        let mut detector = FixtureDetector::new();
        detector.insert("roof.tif", ring(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]));
        detector.insert(
            "roof.tif",
            ring(&[[50.0, 50.0], [80.0, 50.0], [80.0, 90.0], [50.0, 90.0]]),
        );
        detector
    }

    #[test]
    fn test_detects_region_containing_seed() {
        let detector = detector_with_two_regions();
        let region = detector
            .detect("roof.tif", PixelPoint::new(60.0, 70.0))
            .unwrap();
        assert_eq!(region.points()[0], PixelPoint::new(50.0, 50.0));
    }

    #[test]
    fn test_no_region_at_seed() {
        let detector = detector_with_two_regions();
        let result = detector.detect("roof.tif", PixelPoint::new(30.0, 30.0));
        assert!(matches!(result, Err(Error::SegmentationFailure(_))));
    }

    #[test]
    fn test_unknown_image_fails() {
        let detector = FixtureDetector::new();
        let result = detector.detect("unknown.tif", PixelPoint::new(1.0, 1.0));
        assert!(matches!(result, Err(Error::SegmentationFailure(_))));
    }

    #[test]
    fn test_fixture_file_loading() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"roof.tif": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]]}}"#
        )
        .unwrap();

        let detector = FixtureDetector::from_file(file.path()).unwrap();
        let region = detector.detect("roof.tif", PixelPoint::new(5.0, 5.0)).unwrap();
        assert_eq!(region.len(), 4);
    }

    #[test]
    fn test_degenerate_fixture_region_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"roof.tif": [[[0.0, 0.0], [10.0, 0.0]]]}}"#).unwrap();

        let result = FixtureDetector::from_file(file.path());
        assert!(matches!(result, Err(Error::Catalog(_))));
    }
}
