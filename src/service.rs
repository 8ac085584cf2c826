//! Orchestration of the measurement pipeline
//!
//! Each request is a single pass: validate input, optionally auto-detect,
//! compute the pixel area, resolve the georeference, apply the correction,
//! return the result. Nothing is cached between requests and nothing is
//! retried; a failure aborts its own request only.

use std::sync::Arc;

use rayon::prelude::*;

use crate::angles;
use crate::correction::{self, AreaResult};
use crate::detector::AutoDetector;
use crate::error::{Error, Result};
use crate::geometry;
use crate::georef::Georeference;
use crate::metadata::{ImageMetadata, MetadataProvider};
use crate::types::{PixelPoint, Polygon};

/// Square feet per square meter
pub const SQFT_PER_M2: f64 = 10.764;

/// One measured polygon with its area record.
///
/// Carries the polygon that was actually measured: in smart mode that is
/// the detector's boundary, not the seed the user clicked, so the caller
/// can render exactly what the numbers describe.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub calculated_area: AreaResult,
    pub polygon: Polygon,
    /// Area-weighted centroid, absent for degenerate rings
    pub centroid: Option<PixelPoint>,
    pub perimeter_m: f64,
}

/// Aggregate over one batch of polygons
#[derive(Debug, Clone, Copy)]
pub struct BatchTotals {
    pub polygon_count: usize,
    pub apparent_area_m2: f64,
    pub corrected_area_m2: f64,
    pub apparent_area_sqft: f64,
    pub corrected_area_sqft: f64,
    pub perimeter_m: f64,
    pub area_difference_m2: f64,
    pub area_difference_percent: f64,
}

/// The area calculation service: stateless orchestration over the metadata
/// and auto-detection capabilities.
pub struct AreaService {
    metadata: Arc<dyn MetadataProvider>,
    detector: Arc<dyn AutoDetector>,
}

impl AreaService {
    pub fn new(metadata: Arc<dyn MetadataProvider>, detector: Arc<dyn AutoDetector>) -> Self {
        Self { metadata, detector }
    }

    /// Metadata for a catalogued image
    pub fn metadata(&self, image_id: &str) -> Result<ImageMetadata> {
        self.metadata.metadata(image_id)
    }

    /// Manual mode: measures an explicit polygon and echoes it back
    /// unchanged.
    pub fn measure_polygon(
        &self,
        image_id: &str,
        points: Vec<PixelPoint>,
    ) -> Result<Measurement> {
        let polygon = Polygon::new(points)?;
        let metadata = self.metadata.metadata(image_id)?;
        Ok(self.run_pipeline(&metadata, polygon))
    }

    /// Smart mode: forwards the seed to the auto-detector and measures the
    /// boundary it returns.
    ///
    /// A detector result that fails polygon validation counts as a
    /// `SegmentationFailure`: the detector could not produce a usable
    /// region.
    pub fn measure_point(&self, image_id: &str, seed: PixelPoint) -> Result<Measurement> {
        let metadata = self.metadata.metadata(image_id)?;

        let polygon = match self.detector.detect(image_id, seed) {
            Ok(polygon) => polygon,
            Err(Error::InvalidPolygon(msg)) => return Err(Error::SegmentationFailure(msg)),
            Err(e) => return Err(e),
        };

        if !geometry::contains_point(&polygon, seed) {
            log::debug!(
                "detected region for {} does not contain seed ({}, {})",
                image_id,
                seed.x,
                seed.y
            );
        }

        Ok(self.run_pipeline(&metadata, polygon))
    }

    /// Batch mode: measures several polygons against one image and sums
    /// the results. Polygons are independent, so they run in parallel.
    pub fn measure_polygons(
        &self,
        image_id: &str,
        polygons: Vec<Vec<PixelPoint>>,
    ) -> Result<(Vec<Measurement>, BatchTotals)> {
        let metadata = self.metadata.metadata(image_id)?;

        let measurements: Vec<Measurement> = polygons
            .into_par_iter()
            .map(|points| Polygon::new(points).map(|polygon| self.run_pipeline(&metadata, polygon)))
            .collect::<Result<_>>()?;

        let totals = Self::totals(&measurements);
        Ok((measurements, totals))
    }

    fn totals(measurements: &[Measurement]) -> BatchTotals {
        let apparent: f64 = measurements
            .iter()
            .map(|m| m.calculated_area.apparent_area_m2)
            .sum();
        let corrected: f64 = measurements
            .iter()
            .map(|m| m.calculated_area.corrected_area_m2)
            .sum();
        let perimeter: f64 = measurements.iter().map(|m| m.perimeter_m).sum();

        BatchTotals {
            polygon_count: measurements.len(),
            apparent_area_m2: apparent,
            corrected_area_m2: corrected,
            apparent_area_sqft: apparent * SQFT_PER_M2,
            corrected_area_sqft: corrected * SQFT_PER_M2,
            perimeter_m: perimeter,
            area_difference_m2: corrected - apparent,
            area_difference_percent: if apparent > 0.0 {
                (corrected / apparent - 1.0) * 100.0
            } else {
                0.0
            },
        }
    }

    /// Pixel area, georeference, correction. Missing georeferencing
    /// degrades to a 1:1 resolution with no correction instead of failing.
    fn run_pipeline(&self, metadata: &ImageMetadata, polygon: Polygon) -> Measurement {
        let pixel_area = geometry::pixel_area(&polygon);

        let (georef, factor) = match Georeference::resolve(metadata) {
            Ok(georef) => (georef, angles::factor_for(metadata)),
            Err(_) => (Georeference::identity(), None),
        };

        let apparent_area_m2 = georef.apparent_area_m2(pixel_area);
        let calculated_area = correction::apply(pixel_area, apparent_area_m2, factor);
        let centroid = geometry::centroid(&polygon);
        let perimeter_m = georef.perimeter_m(&polygon);

        Measurement {
            calculated_area,
            polygon,
            centroid,
            perimeter_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{CameraOrientation, CatalogProvider, GroundBounds};

    struct StubDetector {
        region: Polygon,
    }

    impl AutoDetector for StubDetector {
        fn detect(&self, _image_id: &str, _seed: PixelPoint) -> Result<Polygon> {
            Ok(self.region.clone())
        }
    }

    struct FailingDetector;

    impl AutoDetector for FailingDetector {
        fn detect(&self, _image_id: &str, _seed: PixelPoint) -> Result<Polygon> {
            Err(Error::SegmentationFailure("model timed out".to_string()))
        }
    }

    struct DegenerateDetector;

    impl AutoDetector for DegenerateDetector {
        fn detect(&self, _image_id: &str, _seed: PixelPoint) -> Result<Polygon> {
            Polygon::new(vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(1.0, 1.0)])
        }
    }

    fn square_points() -> Vec<PixelPoint> {
        vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(20.0, 0.0),
            PixelPoint::new(20.0, 20.0),
            PixelPoint::new(0.0, 20.0),
        ]
    }

    fn metadata_entry(
        crs: bool,
        camera: Option<CameraOrientation>,
    ) -> (String, ImageMetadata) {
        (
            "site.tif".to_string(),
            ImageMetadata {
                width: 100,
                height: 100,
                count: 3,
                dtype: "uint8".to_string(),
                crs: crs.then(|| "EPSG:32632".to_string()),
                bounds: crs.then(|| GroundBounds {
                    lower_left_x: 0.0,
                    lower_left_y: 0.0,
                    upper_right_x: 50.0,
                    upper_right_y: 50.0,
                }),
                camera,
            },
        )
    }

    fn service(crs: bool, camera: Option<CameraOrientation>) -> AreaService {
        let provider = CatalogProvider::from_entries([metadata_entry(crs, camera)]).unwrap();
        AreaService::new(
            Arc::new(provider),
            Arc::new(StubDetector {
                region: Polygon::new(square_points()).unwrap(),
            }),
        )
    }

    #[test]
    fn test_manual_measurement_end_to_end() {
        let service = service(true, None);
        let measurement = service.measure_polygon("site.tif", square_points()).unwrap();

        // 50 m over 100 px gives a gsd of 0.5 on both axes
        let area = measurement.calculated_area;
        assert_eq!(area.pixel_area, 400.0);
        assert_eq!(area.apparent_area_m2, 100.0);
        assert_eq!(area.corrected_area_m2, 100.0);
        assert!(!area.correction_applied);
        assert_eq!(measurement.polygon.points(), &square_points()[..]);
        assert_eq!(measurement.perimeter_m, 40.0);

        let centroid = measurement.centroid.unwrap();
        assert!((centroid.x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_manual_with_camera_correction() {
        let service = service(
            true,
            Some(CameraOrientation {
                pitch_deg: -45.0,
                roll_deg: 0.0,
            }),
        );
        let area = service
            .measure_polygon("site.tif", square_points())
            .unwrap()
            .calculated_area;

        assert!(area.correction_applied);
        assert!((area.correction_factor - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!((area.corrected_area_m2 - 100.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
        assert!((area.area_difference_percent - 41.421356).abs() < 1e-5);
    }

    #[test]
    fn test_missing_georeference_degrades_to_identity() {
        let service = service(false, None);
        let area = service
            .measure_polygon("site.tif", square_points())
            .unwrap()
            .calculated_area;

        assert_eq!(area.pixel_area, 400.0);
        assert_eq!(area.apparent_area_m2, 400.0);
        assert_eq!(area.correction_factor, 1.0);
        assert!(!area.correction_applied);
    }

    #[test]
    fn test_unknown_image_is_not_found() {
        let service = service(true, None);
        let result = service.measure_polygon("other.tif", square_points());
        assert!(matches!(result, Err(Error::ImageNotFound(_))));
    }

    #[test]
    fn test_two_point_polygon_rejected() {
        let service = service(true, None);
        let result = service.measure_polygon(
            "site.tif",
            vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(5.0, 5.0)],
        );
        assert!(matches!(result, Err(Error::InvalidPolygon(_))));
    }

    #[test]
    fn test_collinear_polygon_measures_zero() {
        let service = service(true, None);
        let area = service
            .measure_polygon(
                "site.tif",
                vec![
                    PixelPoint::new(0.0, 0.0),
                    PixelPoint::new(5.0, 5.0),
                    PixelPoint::new(10.0, 10.0),
                ],
            )
            .unwrap()
            .calculated_area;

        assert_eq!(area.pixel_area, 0.0);
        assert_eq!(area.area_difference_percent, 0.0);
        assert!(!area.correction_applied);
    }

    #[test]
    fn test_smart_mode_echoes_detector_boundary() {
        let service = service(true, None);
        let measurement = service
            .measure_point("site.tif", PixelPoint::new(5.0, 5.0))
            .unwrap();

        assert_eq!(measurement.polygon.points(), &square_points()[..]);
        assert_eq!(measurement.calculated_area.pixel_area, 400.0);
    }

    #[test]
    fn test_smart_mode_detector_failure_surfaces() {
        let provider = CatalogProvider::from_entries([metadata_entry(true, None)]).unwrap();
        let service = AreaService::new(Arc::new(provider), Arc::new(FailingDetector));
        let result = service.measure_point("site.tif", PixelPoint::new(5.0, 5.0));
        assert!(matches!(result, Err(Error::SegmentationFailure(_))));
    }

    #[test]
    fn test_smart_mode_degenerate_region_is_segmentation_failure() {
        let provider = CatalogProvider::from_entries([metadata_entry(true, None)]).unwrap();
        let service = AreaService::new(Arc::new(provider), Arc::new(DegenerateDetector));
        let result = service.measure_point("site.tif", PixelPoint::new(5.0, 5.0));
        assert!(matches!(result, Err(Error::SegmentationFailure(_))));
    }

    #[test]
    fn test_batch_totals_sum_members() {
        let service = service(true, None);
        let small = vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(10.0, 0.0),
            PixelPoint::new(10.0, 10.0),
            PixelPoint::new(0.0, 10.0),
        ];
        let (measurements, totals) = service
            .measure_polygons("site.tif", vec![square_points(), small])
            .unwrap();

        assert_eq!(measurements.len(), 2);
        assert_eq!(totals.polygon_count, 2);
        // 100 m2 + 25 m2 at gsd 0.5
        assert_eq!(totals.apparent_area_m2, 125.0);
        assert_eq!(totals.corrected_area_m2, 125.0);
        assert!((totals.apparent_area_sqft - 125.0 * SQFT_PER_M2).abs() < 1e-9);
        assert_eq!(totals.perimeter_m, 60.0);
        assert_eq!(totals.area_difference_percent, 0.0);
    }

    #[test]
    fn test_batch_rejects_any_invalid_member() {
        let service = service(true, None);
        let result = service.measure_polygons(
            "site.tif",
            vec![square_points(), vec![PixelPoint::new(0.0, 0.0)]],
        );
        assert!(matches!(result, Err(Error::InvalidPolygon(_))));
    }
}
