//! Error types for swing plane operations.
//!
//! Errors here signal API misuse or degenerate geometry. Sparse tracking data
//! is not an error: it surfaces as `None` planes or landmarks instead.

use thiserror::Error;

/// Main error type for swing plane operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwingPlaneError {
    /// Plane normal has (near) zero magnitude.
    #[error("Cannot normalize plane with zero normal vector")]
    DegeneratePlane,

    /// Shaft base and tip coincide.
    #[error("Shaft has zero length at frame {frame}")]
    ZeroLengthShaft { frame: i64 },

    /// Not enough points for a plane fit.
    #[error("Need at least {min} points to fit plane, got {actual}")]
    InsufficientPoints { min: usize, actual: usize },

    /// Points and weights have mismatched lengths.
    #[error("Points and weights must have same length: {points} != {weights}")]
    LengthMismatch { points: usize, weights: usize },

    /// Fit weights sum to (near) zero.
    #[error("Total weight must be positive")]
    NonPositiveWeight,

    /// A vector vanished after projection onto a plane.
    #[error("Degenerate projection: {context}")]
    DegenerateProjection { context: String },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input validation errors.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for swing plane operations.
pub type Result<T> = std::result::Result<T, SwingPlaneError>;

impl SwingPlaneError {
    /// Create a zero-length shaft error.
    #[must_use]
    pub const fn zero_length_shaft(frame: i64) -> Self {
        Self::ZeroLengthShaft { frame }
    }

    /// Create an insufficient points error.
    #[must_use]
    pub const fn insufficient_points(min: usize, actual: usize) -> Self {
        Self::InsufficientPoints { min, actual }
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(points: usize, weights: usize) -> Self {
        Self::LengthMismatch { points, weights }
    }

    /// Create a degenerate projection error.
    #[must_use]
    pub fn degenerate_projection(context: impl Into<String>) -> Self {
        Self::DegenerateProjection {
            context: context.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SwingPlaneError::insufficient_points(3, 2);
        assert_eq!(err.to_string(), "Need at least 3 points to fit plane, got 2");

        let err = SwingPlaneError::length_mismatch(4, 3);
        assert!(err.to_string().contains("4 != 3"));
    }

    #[test]
    fn test_error_constructors() {
        let _ = SwingPlaneError::zero_length_shaft(12);
        let _ = SwingPlaneError::degenerate_projection("shaft parallel to normal");
        let _ = SwingPlaneError::invalid_config("min_points must be >= 3");
        let _ = SwingPlaneError::invalid_input("empty");
    }

    #[test]
    fn test_degenerate_plane_message() {
        assert!(SwingPlaneError::DegeneratePlane
            .to_string()
            .contains("zero normal"));
    }
}
