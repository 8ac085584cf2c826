use serde::Serialize;

use crate::correction::AreaResult;
use crate::metadata::{GroundBounds, ImageMetadata};
use crate::service::{BatchTotals, Measurement};

/// Wire form of image metadata; `crs` and `bounds` are null for
/// non-georeferenced images.
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub width: u32,
    pub height: u32,
    pub count: u32,
    pub dtype: String,
    pub crs: Option<String>,
    pub bounds: Option<GroundBounds>,
}

impl From<ImageMetadata> for MetadataResponse {
    fn from(metadata: ImageMetadata) -> Self {
        Self {
            width: metadata.width,
            height: metadata.height,
            count: metadata.count,
            dtype: metadata.dtype,
            crs: metadata.crs,
            bounds: metadata.bounds,
        }
    }
}

/// Wire form of one measured polygon. The polygon is the one that was
/// actually measured, which in smart mode is the detected boundary.
#[derive(Debug, Serialize)]
pub struct AreaResponse {
    pub calculated_area: AreaResult,
    pub polygon: Vec<[f64; 2]>,
    pub centroid: Option<[f64; 2]>,
    pub perimeter_m: f64,
}

impl From<Measurement> for AreaResponse {
    fn from(measurement: Measurement) -> Self {
        Self {
            calculated_area: measurement.calculated_area,
            polygon: measurement
                .polygon
                .points()
                .iter()
                .map(|&p| p.into())
                .collect(),
            centroid: measurement.centroid.map(Into::into),
            perimeter_m: measurement.perimeter_m,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub polygon_count: usize,
    pub total_apparent_area_m2: f64,
    pub total_corrected_area_m2: f64,
    pub total_apparent_area_sqft: f64,
    pub total_corrected_area_sqft: f64,
    pub total_perimeter_m: f64,
    pub total_area_difference_m2: f64,
    pub total_area_difference_percent: f64,
}

impl From<BatchTotals> for TotalsResponse {
    fn from(totals: BatchTotals) -> Self {
        Self {
            polygon_count: totals.polygon_count,
            total_apparent_area_m2: totals.apparent_area_m2,
            total_corrected_area_m2: totals.corrected_area_m2,
            total_apparent_area_sqft: totals.apparent_area_sqft,
            total_corrected_area_sqft: totals.corrected_area_sqft,
            total_perimeter_m: totals.perimeter_m,
            total_area_difference_m2: totals.area_difference_m2,
            total_area_difference_percent: totals.area_difference_percent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub areas: Vec<AreaResponse>,
    pub totals: TotalsResponse,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}
