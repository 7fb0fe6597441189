use image::GrayImage;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use crate::detection::geometry::squared_distance;
use crate::models::Contour;

/// Douglas-Peucker tolerance as a fraction of the contour perimeter (2%)
pub const DEFAULT_ACCURACY_RATIO: f64 = 0.02;

/// Exclusive area range (pixel²) a plausible cone contour must fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBounds {
    pub min: f64,
    pub max: f64,
}

impl AreaBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both ends are strict: an area equal to a bound is rejected
    pub fn contains(&self, area: f64) -> bool {
        self.min < area && area < self.max
    }
}

impl Default for AreaBounds {
    /// Tuned for a cone at the expected camera distance
    fn default() -> Self {
        Self {
            min: 1_000.0,
            max: 300_000.0,
        }
    }
}

/// Inclusive range on the number of sides of the approximated polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideBounds {
    pub min: usize,
    pub max: usize,
}

impl SideBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, sides: usize) -> bool {
        self.min <= sides && sides <= self.max
    }
}

impl Contour {
    /// Number of vertices left after polygon approximation
    pub fn num_sides(&self, accuracy_ratio: f64) -> usize {
        approximate_polygon(self, accuracy_ratio).len()
    }
}

/// Find contours in a binary mask (non-zero pixels are foreground)
pub fn find_contours(mask: &GrayImage) -> Vec<Contour> {
    // Outer borders and hole borders are both kept, like a full tree retrieval
    imageproc::contours::find_contours::<i32>(mask)
        .into_iter()
        .map(|c| Contour::new(c.points))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Keep contours whose area lies strictly inside `bounds`
pub fn filter_by_area(contours: &[Contour], bounds: AreaBounds) -> Vec<Contour> {
    within_area(contours, bounds)
        .map(|(contour, _)| contour.clone())
        .collect()
}

/// Contours inside `bounds`, paired with their area
fn within_area(
    contours: &[Contour],
    bounds: AreaBounds,
) -> impl Iterator<Item = (&Contour, f64)> + '_ {
    contours
        .iter()
        .map(|c| (c, c.area()))
        .filter(move |&(_, area)| bounds.contains(area))
}

/// Lazily keep contours whose approximated polygon has a side count within `bounds`
pub fn filter_by_side_count(
    contours: &[Contour],
    bounds: SideBounds,
) -> impl Iterator<Item = &Contour> + '_ {
    contours
        .iter()
        .filter(move |c| bounds.contains(c.num_sides(DEFAULT_ACCURACY_RATIO)))
}

/// Simplify a closed contour with Douglas-Peucker, tolerance = `accuracy_ratio` × perimeter
pub fn approximate_polygon(contour: &Contour, accuracy_ratio: f64) -> Contour {
    let mut points = contour.points.as_slice();
    // An explicitly repeated closing point would otherwise count as an extra vertex
    if points.len() > 1 && points.first() == points.last() {
        points = &points[..points.len() - 1];
    }
    if points.len() < 3 {
        return Contour::new(points.to_vec());
    }

    // Split the closed curve at two extreme points so the vertex set does not
    // depend on where the point list happens to start
    let first = points[0];
    let (a, a_dist) = farthest_from(points, first);
    if a_dist == 0 {
        // Every point coincides
        return Contour::new(vec![first]);
    }
    let (b, _) = farthest_from(points, points[a]);

    let epsilon = accuracy_ratio * contour.perimeter();
    if epsilon <= 0.0 {
        return Contour::new(points.to_vec());
    }

    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let mut wrapped: Vec<_> = points[hi..].to_vec();
    wrapped.extend_from_slice(&points[..=lo]);

    let mut simplified = approximate_polygon_dp(&points[lo..=hi], epsilon, false);
    let second = approximate_polygon_dp(&wrapped, epsilon, false);

    // Both open halves keep their endpoints, which are the two split points
    simplified.extend_from_slice(&second[1..second.len() - 1]);
    Contour::new(simplified)
}

/// Index of the point farthest from `origin`, first one on ties
fn farthest_from(points: &[Point<i32>], origin: Point<i32>) -> (usize, i64) {
    points
        .iter()
        .enumerate()
        .fold((0, 0), |(best_i, best_d), (i, p)| {
            let d = squared_distance(origin, *p);
            if d > best_d { (i, d) } else { (best_i, best_d) }
        })
}

/// Select the contour most likely to be the cone: the largest one within `bounds`
pub fn select_best(contours: &[Contour], bounds: AreaBounds) -> Option<&Contour> {
    let mut best: Option<(&Contour, f64)> = None;

    for (contour, area) in within_area(contours, bounds) {
        // Strict comparison keeps the first of equally sized contours
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((contour, area)),
        }
    }

    best.map(|(contour, _)| contour)
}
