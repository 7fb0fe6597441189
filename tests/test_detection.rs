//! End-to-end detection tests on synthetic images.
//!
//! Tests cover:
//! - HSV conversion and masking
//! - Full detection with the default configuration
//! - Analysis of contour collections without images
//! - Rendering of the result

mod common;

use common::*;
use conefinder::render;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::point::Point;

#[test]
fn test_rgb_to_hsv_primaries() {
    assert_eq!(preprocessing::rgb_to_hsv(255, 0, 0), [0, 255, 255]);
    assert_eq!(preprocessing::rgb_to_hsv(0, 255, 0), [60, 255, 255]);
    assert_eq!(preprocessing::rgb_to_hsv(0, 0, 255), [120, 255, 255]);
    assert_eq!(preprocessing::rgb_to_hsv(0, 0, 0), [0, 0, 0]);
    assert_eq!(preprocessing::rgb_to_hsv(40, 40, 40), [0, 0, 40]);
}

#[test]
fn test_cone_orange_is_in_default_range() {
    let Rgb([r, g, b]) = CONE_ORANGE;
    let hsv = preprocessing::rgb_to_hsv(r, g, b);
    assert_eq!(hsv, [19, 245, 255]);
    assert!(preprocessing::HsvRange::default().contains(hsv));

    let Rgb([r, g, b]) = BACKGROUND_GRAY;
    assert!(!preprocessing::HsvRange::default().contains(preprocessing::rgb_to_hsv(r, g, b)));
}

#[test]
fn test_in_range_mask() {
    let mut img = RgbImage::from_pixel(4, 4, BACKGROUND_GRAY);
    img.put_pixel(1, 2, CONE_ORANGE);

    let mask = preprocessing::in_range(&preprocessing::to_hsv(&img), preprocessing::HsvRange::default());
    assert_eq!(mask.get_pixel(1, 2), &Luma([255]));
    assert_eq!(mask.pixels().filter(|p| p[0] == 255).count(), 1);
}

#[test]
fn test_median_blur_removes_speckle() {
    let mut img = RgbImage::from_pixel(9, 9, BACKGROUND_GRAY);
    img.put_pixel(4, 4, CONE_ORANGE);

    let blurred = preprocessing::median_blur(&img, 1);
    assert!(blurred.pixels().all(|p| *p == BACKGROUND_GRAY));

    // Radius 0 leaves the image untouched
    assert_eq!(preprocessing::median_blur(&img, 0), img);
}

#[test]
fn test_find_contours_of_filled_square() {
    let mut mask = GrayImage::new(50, 50);
    for y in 10..40 {
        for x in 10..40 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    let found = contours::find_contours(&mask);
    assert_eq!(found.len(), 1);

    // Border pixels run from 10 to 39 on both axes
    let square = &found[0];
    assert_eq!(square.area(), 29.0 * 29.0);
    assert_eq!(geometry::compute_centroid(square), Point::new(24, 24));
}

#[test]
fn test_detect_cone() -> anyhow::Result<()> {
    let detector = ConeDetector::default();
    let detection = detector.detect(&cone_image())?.expect("cone should be found");

    // Filled triangle centroid is (100, 126.7); apex (100, 20) points up
    assert!((detection.center.x - 100).abs() <= 3, "center = {:?}", detection.center);
    assert!((detection.center.y - 126).abs() <= 5, "center = {:?}", detection.center);
    assert!((detection.farthest_point.x - 100).abs() <= 5, "tip = {:?}", detection.farthest_point);
    assert!(detection.farthest_point.y < 40, "tip = {:?}", detection.farthest_point);
    assert!((detection.orientation - 90.0).abs() < 5.0, "orientation = {}", detection.orientation);
    assert!(detection.area > 8_000.0 && detection.area < 10_000.0, "area = {}", detection.area);

    Ok(())
}

#[test]
fn test_detect_without_blur() -> anyhow::Result<()> {
    let detector = ConeDetector::new(DetectorConfig {
        blur_radius: 0,
        ..DetectorConfig::default()
    });
    let detection = detector.detect(&cone_image())?.expect("cone should be found");

    assert!((detection.center.x - 100).abs() <= 1, "center = {:?}", detection.center);
    assert!((detection.center.y - 126).abs() <= 2, "center = {:?}", detection.center);
    assert!((detection.orientation - 90.0).abs() < 2.0, "orientation = {}", detection.orientation);

    Ok(())
}

#[test]
fn test_detect_nothing_in_empty_scene() -> anyhow::Result<()> {
    assert!(ConeDetector::default().detect(&empty_scene())?.is_none());
    Ok(())
}

#[test]
fn test_detect_respects_area_bounds() -> anyhow::Result<()> {
    let detector = ConeDetector::new(DetectorConfig {
        area_bounds: AreaBounds::new(20_000.0, 300_000.0),
        ..DetectorConfig::default()
    });
    assert!(detector.detect(&cone_image())?.is_none());
    Ok(())
}

#[test]
fn test_detect_with_side_filter() -> anyhow::Result<()> {
    let triangles_only = ConeDetector::new(DetectorConfig {
        blur_radius: 0,
        side_bounds: Some(SideBounds::new(3, 3)),
        ..DetectorConfig::default()
    });
    assert!(triangles_only.detect(&cone_image())?.is_some());

    let quads_only = ConeDetector::new(DetectorConfig {
        blur_radius: 0,
        side_bounds: Some(SideBounds::new(4, 4)),
        ..DetectorConfig::default()
    });
    assert!(quads_only.detect(&cone_image())?.is_none());
    Ok(())
}

#[test]
fn test_analyze_contours_picks_largest() {
    let detector = ConeDetector::default();
    let small = rectangle(0, 0, 40, 50);
    let large = rectangle(100, 100, 50, 100);

    let detection = detector
        .analyze_contours(&[small, large])
        .unwrap()
        .expect("a candidate");

    assert_eq!(detection.center, Point::new(125, 150));
    assert_eq!(detection.area, 5000.0);
    // Corners tie, the first listed corner wins
    assert_eq!(detection.farthest_point, Point::new(100, 100));
}

#[test]
fn test_analyze_contours_empty() {
    let detection = ConeDetector::default().analyze_contours(&[]).unwrap();
    assert!(detection.is_none());
}

#[test]
fn test_detection_serializes_points_as_pairs() -> anyhow::Result<()> {
    let detection = ConeDetector::default()
        .analyze_contours(&[rectangle(100, 100, 50, 100)])?
        .expect("a candidate");

    let json = serde_json::to_value(&detection)?;
    assert_eq!(json["center"], serde_json::json!([125, 150]));
    assert_eq!(json["farthest_point"], serde_json::json!([100, 100]));
    Ok(())
}

#[test]
fn test_draw_detection_marks_center() -> anyhow::Result<()> {
    let img = cone_image();
    let detection = ConeDetector::default().detect(&img)?.expect("cone should be found");

    let annotated = render::draw_detection(&img, &detection);
    let center = detection.center;
    assert_eq!(annotated.get_pixel(center.x as u32, center.y as u32), &render::CENTER_COLOR);
    assert_eq!(annotated.dimensions(), (200, 200));
    Ok(())
}

#[test]
fn test_draw_detection_marks_contour() -> anyhow::Result<()> {
    let img = cone_image();
    let detection = ConeDetector::default().detect(&img)?.expect("cone should be found");
    assert!(!detection.contour.is_empty());

    let annotated = render::draw_detection(&img, &detection);
    // Bottom-most boundary point lies on the base, away from the center and the ray
    let base = *detection.contour.points.iter().max_by_key(|p| p.y).expect("points");
    assert_eq!(annotated.get_pixel(base.x as u32, base.y as u32), &render::CONTOUR_COLOR);
    Ok(())
}

#[test]
fn test_draw_contour_points() {
    let mut canvas = RgbImage::from_pixel(20, 20, BACKGROUND_GRAY);
    let contour = Contour::from_coords(&[(5, 5), (14, 5), (14, 14)]);

    render::draw_contour_points(&mut canvas, &contour, render::CONTOUR_COLOR, 1);

    for p in &contour.points {
        assert_eq!(canvas.get_pixel(p.x as u32, p.y as u32), &render::CONTOUR_COLOR);
    }
    // Radius 1 reaches direct neighbours only
    assert_eq!(canvas.get_pixel(6, 5), &render::CONTOUR_COLOR);
    assert_eq!(canvas.get_pixel(9, 9), &BACKGROUND_GRAY);
    assert_eq!(canvas.get_pixel(0, 0), &BACKGROUND_GRAY);
}
