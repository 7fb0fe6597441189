use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use crate::models::{ConeDetection, Contour};

pub const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const ORIENTATION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const CENTER_RADIUS: i32 = 5;
pub const CONTOUR_POINT_RADIUS: i32 = 1;

/// Draw a filled dot at every contour point
pub fn draw_contour_points(canvas: &mut RgbImage, contour: &Contour, color: Rgb<u8>, radius: i32) {
    for p in &contour.points {
        draw_filled_circle_mut(canvas, (p.x, p.y), radius, color);
    }
}

/// Draw the selected boundary, the centroid dot and a ray towards the farthest point
pub fn draw_detection(img: &DynamicImage, detection: &ConeDetection) -> RgbImage {
    let mut canvas = img.to_rgb8();
    let center = detection.center;
    let tip = detection.farthest_point;

    draw_contour_points(&mut canvas, &detection.contour, CONTOUR_COLOR, CONTOUR_POINT_RADIUS);
    draw_line_segment_mut(
        &mut canvas,
        (center.x as f32, center.y as f32),
        (tip.x as f32, tip.y as f32),
        ORIENTATION_COLOR,
    );
    // Dot goes last so the ray never covers it
    draw_filled_circle_mut(&mut canvas, (center.x, center.y), CENTER_RADIUS, CENTER_COLOR);

    canvas
}
