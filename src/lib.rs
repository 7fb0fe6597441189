pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;

pub use models::{ConeDetection, Contour, Moments};
pub use error::GeometryError;
pub use detection::{ConeDetector, DetectorConfig};
pub use detection::contours::{AreaBounds, SideBounds};
pub use detection::preprocessing::HsvRange;
pub use pipeline::{
    Pipeline, PipelineData, PipelineStep, PipelineContext, MetadataValue, DebugConfig
};
