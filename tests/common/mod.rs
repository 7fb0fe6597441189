#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from conefinder for tests
pub use conefinder::detection::{contours, geometry, preprocessing};
pub use conefinder::{AreaBounds, ConeDetector, Contour, DetectorConfig, GeometryError, SideBounds};
