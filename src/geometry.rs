//! Pure 2D polygon math shared by every measurement path
//!
//! All routines operate on pixel-space coordinates and are fully
//! deterministic, including the boundary tie-breaks of the containment
//! test. The interactive client reimplements these exact rules, so any
//! change here is a protocol change.

use crate::types::{PixelPoint, Polygon};

/// Euclidean distance between two vertices
pub fn vertex_distance(a: PixelPoint, b: PixelPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Signed shoelace sum over the ring's edges, halved.
///
/// The sign encodes winding direction; callers that only need magnitude
/// use [`pixel_area`].
pub fn signed_area(polygon: &Polygon) -> f64 {
    let mut sum = 0.0;
    for (a, b) in polygon.edges() {
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Polygon area in square pixels.
///
/// Degenerate (collinear) rings yield 0 and are valid input; the caller
/// decides whether a zero area is acceptable.
pub fn pixel_area(polygon: &Polygon) -> f64 {
    signed_area(polygon).abs()
}

/// Area-weighted centroid, built from the same edge terms as the shoelace
/// sum. Undefined when the signed area vanishes.
pub fn centroid(polygon: &Polygon) -> Option<PixelPoint> {
    let area = signed_area(polygon);
    if area == 0.0 {
        return None;
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for (a, b) in polygon.edges() {
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    Some(PixelPoint::new(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Ring perimeter in pixels
pub fn perimeter(polygon: &Polygon) -> f64 {
    polygon.edges().map(|(a, b)| vertex_distance(a, b)).sum()
}

/// Ray-casting containment test with deterministic boundary behavior.
///
/// A horizontal ray runs from `point` toward +x and edge crossings are
/// counted; an odd count means inside. Tie-breaks:
/// - horizontal edges never count as crossings
/// - every other edge is normalized by ordering its endpoints by y and
///   counts over the half-open interval `[min_y, max_y)`
/// - the edge's exact x at the query y is a crossing when it lies at or to
///   the right of the query x
pub fn contains_point(polygon: &Polygon, point: PixelPoint) -> bool {
    let mut inside = false;

    for (a, b) in polygon.edges() {
        let (lo, hi) = if a.y <= b.y { (a, b) } else { (b, a) };
        if lo.y == hi.y {
            continue;
        }
        if point.y < lo.y || point.y >= hi.y {
            continue;
        }

        let x_at = lo.x + (point.y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
        if x_at >= point.x {
            inside = !inside;
        }
    }

    inside
}
