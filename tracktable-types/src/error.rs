use thiserror::Error;

/// Validation failures raised by the geometry primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A bounding box whose minimum corner exceeds its maximum corner in
    /// some dimension. Empty boxes are not representable.
    #[error("malformed bounding box: min exceeds max in dimension {dimension}")]
    MalformedBox { dimension: usize },

    /// A per-dimension search half-span with a negative component.
    #[error("search half-span must be non-negative in dimension {dimension}")]
    NegativeHalfSpan { dimension: usize },
}
