use crate::pipeline::{PipelineData, PipelineStep, PipelineContext, MetadataValue};
use crate::detection::{preprocessing, contours, ConeDetector, DetectorConfig};
use crate::detection::contours::{AreaBounds, SideBounds};
use crate::detection::preprocessing::HsvRange;
use crate::models::{ConeDetection, Contour};
use crate::render;
use anyhow::Result;
use image::DynamicImage;
use imageproc::point::Point;

/// Remove noise with a median filter
pub struct MedianBlurStep {
    pub radius: u32,
}

impl PipelineStep for MedianBlurStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let blurred = preprocessing::median_blur(&item.image.to_rgb8(), self.radius);
            result.push(item.with_image(DynamicImage::ImageRgb8(blurred)));
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Median Blur"
    }
}

/// Threshold the image in HSV space, producing a binary mask
pub struct HsvMaskStep {
    pub range: HsvRange,
}

impl PipelineStep for HsvMaskStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let hsv = preprocessing::to_hsv(&item.image.to_rgb8());
            let mask = preprocessing::in_range(&hsv, self.range);
            result.push(item.with_image(DynamicImage::ImageLuma8(mask)));
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "HSV Mask"
    }
}

/// Find contours in a mask and describe the best cone candidate.
/// Items without a candidate are dropped; survivors carry the original image again.
#[derive(Default)]
pub struct ConeAnalysisStep {
    pub area_bounds: AreaBounds,
    pub side_bounds: Option<SideBounds>,
}

impl PipelineStep for ConeAnalysisStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let detector = ConeDetector::new(DetectorConfig {
            area_bounds: self.area_bounds,
            side_bounds: self.side_bounds,
            ..DetectorConfig::default()
        });

        let mut result = Vec::new();
        for item in data {
            let found = contours::find_contours(&item.image.to_luma8());
            let contour_count = found.len() as i64;

            if let Some(detection) = detector.analyze_contours(&found)? {
                let original = item.original.as_ref().clone();
                let new_item = item
                    .with_image(original)
                    .with_metadata("contour_count", MetadataValue::Int(contour_count));
                result.push(attach_detection(new_item, &detection));
            }
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Cone Analysis"
    }
}

/// Draw the detection stored in metadata onto the image
pub struct AnnotateStep;

impl PipelineStep for AnnotateStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            let detection = detection_from_metadata(&item)
                .ok_or_else(|| anyhow::anyhow!("Annotate step needs a preceding cone analysis"))?;
            let annotated = render::draw_detection(&item.image, &detection);
            result.push(item.with_image(DynamicImage::ImageRgb8(annotated)));
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Annotate"
    }
}

/// Store a detection's fields as metadata
pub fn attach_detection(item: PipelineData, detection: &ConeDetection) -> PipelineData {
    item.with_metadata("center_x", MetadataValue::Int(detection.center.x.into()))
        .with_metadata("center_y", MetadataValue::Int(detection.center.y.into()))
        .with_metadata("farthest_x", MetadataValue::Int(detection.farthest_point.x.into()))
        .with_metadata("farthest_y", MetadataValue::Int(detection.farthest_point.y.into()))
        .with_metadata("orientation", MetadataValue::Float(detection.orientation))
        .with_metadata("area", MetadataValue::Float(detection.area))
        .with_metadata("contour", MetadataValue::Points(detection.contour.points.clone()))
}

/// Rebuild a detection from metadata written by `attach_detection`
pub fn detection_from_metadata(item: &PipelineData) -> Option<ConeDetection> {
    let coord = |key: &str| item.get_int(key).and_then(|v| i32::try_from(v).ok());
    Some(ConeDetection {
        center: Point::new(coord("center_x")?, coord("center_y")?),
        farthest_point: Point::new(coord("farthest_x")?, coord("farthest_y")?),
        orientation: item.get_float("orientation")?,
        area: item.get_float("area")?,
        contour: Contour::new(item.get_points("contour")?.to_vec()),
    })
}
