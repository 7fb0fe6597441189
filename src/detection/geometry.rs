//! Centroid, extreme point and orientation of a selected contour.
//!
//! Angles follow the on-screen layout used when drawing the result, with the
//! y axis pointing down:
//!
//! ```text
//!          90
//!     180      360
//!          270
//! ```
//!
//! A ray pointing right reports 360, not 0, so outputs lie in `(0, 360]`.

use imageproc::point::Point;
use crate::error::GeometryError;
use crate::models::Contour;

/// Centroid reported for contours that enclose no area
pub const DEGENERATE_CENTROID: Point<i32> = Point { x: 0, y: 0 };

/// Area-weighted centroid, truncated toward zero
pub fn compute_centroid(contour: &Contour) -> Point<i32> {
    let moments = contour.moments();
    if moments.m00 == 0.0 {
        return DEGENERATE_CENTROID;
    }
    Point::new(
        (moments.m10 / moments.m00) as i32,
        (moments.m01 / moments.m00) as i32,
    )
}

/// Squared euclidean distance, only meant for ranking points
pub fn squared_distance(p1: Point<i32>, p2: Point<i32>) -> i64 {
    let dx = i64::from(p1.x) - i64::from(p2.x);
    let dy = i64::from(p1.y) - i64::from(p2.y);
    dx * dx + dy * dy
}

/// Contour point farthest from `center` (the centroid when not given).
///
/// The first point wins when several share the maximum distance.
pub fn farthest_point(
    contour: &Contour,
    center: Option<Point<i32>>,
) -> Result<Point<i32>, GeometryError> {
    let center = center.unwrap_or_else(|| compute_centroid(contour));

    let mut points = contour.points.iter().copied();
    let first = points.next().ok_or(GeometryError::EmptyContour)?;

    let mut best = first;
    let mut best_dist = squared_distance(center, first);
    for point in points {
        let dist = squared_distance(center, point);
        if dist > best_dist {
            best = point;
            best_dist = dist;
        }
    }

    Ok(best)
}

/// Angle of the ray from `p1` to `p2` in degrees, in `(0, 360]`
pub fn angle_degrees(p1: Point<i32>, p2: Point<i32>) -> f64 {
    let dx = f64::from(p2.x) - f64::from(p1.x);
    let dy = f64::from(p2.y) - f64::from(p1.y);

    // atan2(0, 0) is 0, so coincident points behave like a ray pointing right
    let mut degrees = dy.atan2(dx).to_degrees();
    while degrees < 0.0 {
        degrees += 360.0;
    }

    // Flip so angles grow counterclockwise on screen
    360.0 - degrees
}

/// Direction from the center to the farthest contour point
pub fn orientation(contour: &Contour, center: Option<Point<i32>>) -> Result<f64, GeometryError> {
    let center = center.unwrap_or_else(|| compute_centroid(contour));
    let tip = farthest_point(contour, Some(center))?;
    Ok(angle_degrees(center, tip))
}
