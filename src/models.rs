use imageproc::point::Point;
use serde::{Serialize, Serializer};

/// Closed boundary polygon in image coordinates (last point joins the first)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Build a contour from `(x, y)` pairs
    pub fn from_coords(coords: &[(i32, i32)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the polygon edges, including the closing edge back to the first point
    fn edges(&self) -> impl Iterator<Item = (Point<i32>, Point<i32>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Enclosed area (shoelace formula), independent of winding direction
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let twice_signed: f64 = self
            .edges()
            .map(|(p, q)| cross(p, q))
            .sum();
        twice_signed.abs() / 2.0
    }

    /// Closed boundary length
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        imageproc::geometry::arc_length(&self.points, true)
    }

    /// Spatial moments of the enclosed region via Green's theorem
    pub fn moments(&self) -> Moments {
        if self.points.len() < 3 {
            return Moments::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;
        for (p, q) in self.edges() {
            let c = cross(p, q);
            a00 += c;
            a10 += c * f64::from(p.x + q.x);
            a01 += c * f64::from(p.y + q.y);
        }

        // Clockwise and counterclockwise polygons describe the same region
        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }
}

impl From<Vec<Point<i32>>> for Contour {
    fn from(points: Vec<Point<i32>>) -> Self {
        Self::new(points)
    }
}

fn cross(p: Point<i32>, q: Point<i32>) -> f64 {
    f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y)
}

/// Zeroth and first order spatial moments of a contour
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

/// Geometric description of the selected cone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConeDetection {
    #[serde(serialize_with = "serialize_point")]
    pub center: Point<i32>,
    #[serde(serialize_with = "serialize_point")]
    pub farthest_point: Point<i32>,
    /// Degrees, see `geometry::angle_degrees` for the convention
    pub orientation: f64,
    pub area: f64,
    /// Boundary of the selected contour, used for drawing only
    #[serde(skip)]
    pub contour: Contour,
}

fn serialize_point<S: Serializer>(point: &Point<i32>, serializer: S) -> Result<S::Ok, S::Error> {
    [point.x, point.y].serialize(serializer)
}
