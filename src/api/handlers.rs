use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Error;
use crate::types::PixelPoint;

use super::models::*;
use super::AppState;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Maps an engine error onto its HTTP status and wire kind.
///
/// `GeoreferenceMissing` never reaches the wire on measurement paths (the
/// service degrades instead), but the mapping stays total.
pub fn error_response(err: Error) -> ApiError {
    let (status, kind) = match &err {
        Error::InvalidPolygon(_) => (StatusCode::BAD_REQUEST, "invalid_polygon"),
        Error::ImageNotFound(_) => (StatusCode::NOT_FOUND, "image_not_found"),
        Error::SegmentationFailure(_) => (StatusCode::BAD_GATEWAY, "segmentation_failure"),
        Error::GeoreferenceMissing => (StatusCode::INTERNAL_SERVER_ERROR, "georeference_missing"),
        Error::Io(_) | Error::Catalog(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind,
        }),
    )
}

pub async fn get_metadata(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<Json<MetadataResponse>, ApiError> {
    state
        .service
        .metadata(&image_id)
        .map(|metadata| Json(MetadataResponse::from(metadata)))
        .map_err(error_response)
}

pub async fn calc_custom_area(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
    Json(points): Json<Vec<[f64; 2]>>,
) -> Result<Json<AreaResponse>, ApiError> {
    let points = points.into_iter().map(PixelPoint::from).collect();

    state
        .service
        .measure_polygon(&image_id, points)
        .map(|measurement| Json(AreaResponse::from(measurement)))
        .map_err(error_response)
}

pub async fn calc_smart_area(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
    Json(point): Json<[f64; 2]>,
) -> Result<Json<AreaResponse>, ApiError> {
    state
        .service
        .measure_point(&image_id, PixelPoint::from(point))
        .map(|measurement| Json(AreaResponse::from(measurement)))
        .map_err(error_response)
}

pub async fn calc_batch_area(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
    Json(polygons): Json<Vec<Vec<[f64; 2]>>>,
) -> Result<Json<BatchResponse>, ApiError> {
    let polygons = polygons
        .into_iter()
        .map(|points| points.into_iter().map(PixelPoint::from).collect())
        .collect();

    state
        .service
        .measure_polygons(&image_id, polygons)
        .map(|(measurements, totals)| {
            Json(BatchResponse {
                areas: measurements.into_iter().map(AreaResponse::from).collect(),
                totals: TotalsResponse::from(totals),
            })
        })
        .map_err(error_response)
}
