pub mod preprocessing;
pub mod contours;
pub mod geometry;
pub mod steps;

use image::DynamicImage;
use tracing::{debug, info};
use crate::error::GeometryError;
use crate::models::{ConeDetection, Contour};
use contours::{AreaBounds, SideBounds};
use preprocessing::HsvRange;

/// Tunable parameters for cone detection
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Median filter radius (0 disables blurring)
    pub blur_radius: u32,
    pub hsv_range: HsvRange,
    pub area_bounds: AreaBounds,
    /// Optional polygon side count filter applied before area selection
    pub side_bounds: Option<SideBounds>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blur_radius: 5,
            hsv_range: HsvRange::default(),
            area_bounds: AreaBounds::default(),
            side_bounds: None,
        }
    }
}

/// Main cone detection orchestrator
#[derive(Debug, Clone, Default)]
pub struct ConeDetector {
    pub config: DetectorConfig,
}

impl ConeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Pick the best candidate among `found` and describe it
    pub fn analyze_contours(&self, found: &[Contour]) -> Result<Option<ConeDetection>, GeometryError> {
        let candidates: Vec<Contour> = match self.config.side_bounds {
            Some(bounds) => contours::filter_by_side_count(found, bounds).cloned().collect(),
            None => found.to_vec(),
        };

        let Some(best) = contours::select_best(&candidates, self.config.area_bounds) else {
            debug!(candidates = candidates.len(), "no contour within area bounds");
            return Ok(None);
        };

        let center = geometry::compute_centroid(best);
        let farthest_point = geometry::farthest_point(best, Some(center))?;
        let orientation = geometry::angle_degrees(center, farthest_point);

        Ok(Some(ConeDetection {
            center,
            farthest_point,
            orientation,
            area: best.area(),
            contour: best.clone(),
        }))
    }

    /// Run the full detection on an image
    pub fn detect(&self, img: &DynamicImage) -> anyhow::Result<Option<ConeDetection>> {
        info!(width = img.width(), height = img.height(), "detecting cone");

        let mask = preprocessing::build_mask(img, self.config.blur_radius, self.config.hsv_range);
        let found = contours::find_contours(&mask);
        debug!(contours = found.len(), "extracted contours from mask");

        let detection = self.analyze_contours(&found)?;
        match &detection {
            Some(d) => info!(
                center_x = d.center.x,
                center_y = d.center.y,
                orientation = d.orientation,
                area = d.area,
                "cone detected"
            ),
            None => info!("no cone candidate found"),
        }

        Ok(detection)
    }
}
