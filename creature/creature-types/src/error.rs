//! Error types for topology construction.

use thiserror::Error;

/// Errors that can occur while deriving segment topology from piece
/// definitions.
///
/// These surface only at construction time; the per-frame simulation loop
/// never returns errors.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A piece has coincident front and back attachment points, so no rest
    /// axis can be derived from it.
    #[error("piece '{0}' has coincident front/back attachment points")]
    DegenerateAttachment(&'static str),

    /// A collision sphere was configured with a non-positive radius.
    #[error("piece '{piece}' has a collision sphere with non-positive radius {radius}")]
    InvalidSphereRadius {
        /// Name of the offending piece slot.
        piece: &'static str,
        /// The rejected radius.
        radius: f64,
    },
}

/// Result type for topology construction.
pub type TopologyResult<T> = std::result::Result<T, TopologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TopologyError::DegenerateAttachment("head");
        assert!(format!("{err}").contains("head"));

        let err = TopologyError::InvalidSphereRadius {
            piece: "tail",
            radius: -0.5,
        };
        assert!(format!("{err}").contains("-0.5"));
    }
}
