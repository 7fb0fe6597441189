use conefinder::Contour;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

/// Cone orange, inside the default HSV range (H=19, S=245, V=255)
pub const CONE_ORANGE: Rgb<u8> = Rgb([255, 165, 10]);

/// Neutral background, zero saturation so it never matches
pub const BACKGROUND_GRAY: Rgb<u8> = Rgb([40, 40, 40]);

/// Axis-aligned rectangle listed by its four corners, clockwise on screen
pub fn rectangle(x: i32, y: i32, width: i32, height: i32) -> Contour {
    Contour::from_coords(&[
        (x, y),
        (x + width, y),
        (x + width, y + height),
        (x, y + height),
    ])
}

/// Closed polygon with a point at every unit step along each edge,
/// similar to what border following produces
pub fn dense_polygon(vertices: &[(i32, i32)]) -> Contour {
    let mut points = Vec::new();
    for (i, &(x0, y0)) in vertices.iter().enumerate() {
        let (x1, y1) = vertices[(i + 1) % vertices.len()];
        let steps = (x1 - x0).abs().max((y1 - y0).abs());
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            let x = (x0 as f64 + t * (x1 - x0) as f64).round() as i32;
            let y = (y0 as f64 + t * (y1 - y0) as f64).round() as i32;
            points.push(Point::new(x, y));
        }
    }
    Contour::new(points)
}

/// Gray image with a filled orange triangle pointing up.
/// Vertices: apex (100, 20), base (40, 180) and (160, 180).
pub fn cone_image() -> DynamicImage {
    let mut img = RgbImage::from_pixel(200, 200, BACKGROUND_GRAY);
    let triangle = [Point::new(100, 20), Point::new(40, 180), Point::new(160, 180)];
    draw_polygon_mut(&mut img, &triangle, CONE_ORANGE);
    DynamicImage::ImageRgb8(img)
}

/// Gray image with no orange at all
pub fn empty_scene() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, BACKGROUND_GRAY))
}
