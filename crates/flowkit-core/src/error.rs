use thiserror::Error;

/// Errors raised while parsing or validating a prop contract.
#[derive(Error, Debug)]
pub enum ContractError {
    /// Malformed JSON, a wrong type, a missing required field or an unrecognized field.
    #[error("Failed to parse props: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("minZoom ({min}) must not exceed maxZoom ({max})")]
    ZoomRange { min: f32, max: f32 },
    #[error("defaultZoom ({zoom}) must lie within [{min}, {max}]")]
    DefaultZoomOutOfRange { zoom: f32, min: f32, max: f32 },
    #[error("{field} extent is inverted: [{x0}, {y0}] .. [{x1}, {y1}]")]
    InvertedExtent {
        field: &'static str,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    #[error("A node style resolver function cannot be serialized")]
    UnserializableResolver,
}
