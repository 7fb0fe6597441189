use thiserror::Error;

/// Failures raised by contour geometry when an input shape has no defined answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("contour has no points")]
    EmptyContour,
}
