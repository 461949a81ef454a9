//! Configuration for swing plane analysis.
//!
//! This module provides the [`SwingPlaneConfig`] struct which centralizes all
//! tunable thresholds for plane fitting, phase detection and metrics, along
//! with a capture-rate preset.
//!
//! # Example
//!
//! ```
//! use swing_plane::SwingPlaneConfig;
//!
//! // Defaults are tuned for 30 fps capture
//! let config = SwingPlaneConfig::default();
//! assert!(config.validate().is_ok());
//!
//! // High-speed camera: frame windows scale with the capture rate
//! let slow_mo = SwingPlaneConfig::for_frame_rate(240.0);
//! assert_eq!(slow_mo.impact_zone_frames, 80);
//! ```

use crate::error::{Result, SwingPlaneError};
use crate::math::linalg::norm3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capture rate the default frame windows are tuned for.
pub const REFERENCE_FRAME_RATE: f64 = 30.0;

/// How the analyzer treats shaft positions whose frame numbers go backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameOrderPolicy {
    /// Log a warning and analyze the input as given.
    #[default]
    Permissive,
    /// Reject the input with an `InvalidInput` error.
    Strict,
}

/// Configuration for swing plane analysis.
///
/// # Fitting Parameters
///
/// - `impact_zone_weight`: Regression weight for positions near impact (>= 1).
/// - `impact_zone_frames`: Half-width of the impact zone, in frames.
/// - `min_points`: Minimum positions for [`PlaneCalculator`](crate::PlaneCalculator) to fit.
///
/// # Phase Parameters
///
/// - `min_phase_points`: Minimum positions per swing phase.
/// - `address_frames`: Length of the address window from the first frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwingPlaneConfig {
    /// Weight applied to positions within `impact_zone_frames` of impact.
    pub impact_zone_weight: f64,

    /// Frames on either side of impact that receive the impact weight.
    pub impact_zone_frames: u32,

    /// Minimum shaft positions required to fit a plane.
    pub min_points: usize,

    /// Minimum shaft positions required per swing phase.
    pub min_phase_points: usize,

    /// Number of frames from the first frame treated as address.
    pub address_frames: u32,

    /// Direction to target used for swing path (normalized on use).
    pub target_direction: [f64; 3],

    /// Handling of non-monotonic frame numbers.
    pub frame_order: FrameOrderPolicy,
}

impl Default for SwingPlaneConfig {
    fn default() -> Self {
        Self {
            impact_zone_weight: 2.0,
            impact_zone_frames: 10,
            min_points: 10,
            min_phase_points: 5,
            address_frames: 10,
            target_direction: [0.0, 1.0, 0.0],
            frame_order: FrameOrderPolicy::Permissive,
        }
    }
}

impl SwingPlaneConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.impact_zone_weight.is_nan() || self.impact_zone_weight < 1.0 {
            return Err(SwingPlaneError::invalid_config(format!(
                "impact_zone_weight must be >= 1.0, got {}",
                self.impact_zone_weight
            )));
        }
        if self.impact_zone_frames < 1 {
            return Err(SwingPlaneError::invalid_config(
                "impact_zone_frames must be >= 1, got 0",
            ));
        }
        if self.min_points < 3 {
            return Err(SwingPlaneError::invalid_config(format!(
                "min_points must be >= 3, got {}",
                self.min_points
            )));
        }
        if self.min_phase_points < 3 {
            return Err(SwingPlaneError::invalid_config(format!(
                "min_phase_points must be >= 3, got {}",
                self.min_phase_points
            )));
        }
        if self.address_frames < 1 {
            return Err(SwingPlaneError::invalid_config(
                "address_frames must be >= 1, got 0",
            ));
        }
        let norm = norm3(&self.target_direction);
        if !norm.is_finite() || norm < 1e-10 {
            return Err(SwingPlaneError::invalid_config(
                "target_direction must be a non-zero finite vector",
            ));
        }
        Ok(())
    }

    /// Preset for a given capture rate.
    ///
    /// The defaults assume 30 fps. Frame windows are scaled so they cover the
    /// same span of time at `fps`; weights and point counts are unchanged.
    /// Non-positive or non-finite rates fall back to the defaults.
    #[must_use]
    pub fn for_frame_rate(fps: f64) -> Self {
        let defaults = Self::default();
        if !fps.is_finite() || fps <= 0.0 {
            return defaults;
        }
        let scale = fps / REFERENCE_FRAME_RATE;
        Self {
            impact_zone_frames: scale_frames(defaults.impact_zone_frames, scale),
            address_frames: scale_frames(defaults.address_frames, scale),
            ..defaults
        }
    }

    /// Set the impact zone weight.
    #[must_use]
    pub const fn with_impact_zone_weight(mut self, weight: f64) -> Self {
        self.impact_zone_weight = weight;
        self
    }

    /// Set the impact zone half-width in frames.
    #[must_use]
    pub const fn with_impact_zone_frames(mut self, frames: u32) -> Self {
        self.impact_zone_frames = frames;
        self
    }

    /// Set the minimum points per plane fit.
    #[must_use]
    pub const fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Set the minimum points per swing phase.
    #[must_use]
    pub const fn with_min_phase_points(mut self, min_phase_points: usize) -> Self {
        self.min_phase_points = min_phase_points;
        self
    }

    /// Set the address window length.
    #[must_use]
    pub const fn with_address_frames(mut self, frames: u32) -> Self {
        self.address_frames = frames;
        self
    }

    /// Set the target direction.
    #[must_use]
    pub const fn with_target_direction(mut self, direction: [f64; 3]) -> Self {
        self.target_direction = direction;
        self
    }

    /// Set the frame order policy.
    #[must_use]
    pub const fn with_frame_order(mut self, policy: FrameOrderPolicy) -> Self {
        self.frame_order = policy;
        self
    }
}

fn scale_frames(frames: u32, scale: f64) -> u32 {
    let scaled = (f64::from(frames) * scale).round();
    if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (scaled as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SwingPlaneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.impact_zone_weight, 2.0);
        assert_eq!(config.impact_zone_frames, 10);
        assert_eq!(config.min_points, 10);
        assert_eq!(config.min_phase_points, 5);
        assert_eq!(config.frame_order, FrameOrderPolicy::Permissive);
    }

    #[test]
    fn test_validation() {
        let mut config = SwingPlaneConfig::default();

        config.impact_zone_weight = 0.5;
        assert!(config.validate().is_err());

        config.impact_zone_weight = f64::NAN;
        assert!(config.validate().is_err());

        config.impact_zone_weight = 1.0;
        config.impact_zone_frames = 0;
        assert!(config.validate().is_err());

        config.impact_zone_frames = 1;
        config.min_points = 2;
        assert!(config.validate().is_err());

        config.min_points = 3;
        config.min_phase_points = 2;
        assert!(config.validate().is_err());

        config.min_phase_points = 3;
        config.target_direction = [0.0, 0.0, 0.0];
        assert!(config.validate().is_err());

        config.target_direction = [1.0, 0.0, 0.0];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_frame_rate_preset() {
        let config = SwingPlaneConfig::for_frame_rate(240.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.impact_zone_frames, 80);
        assert_eq!(config.address_frames, 80);
        assert_eq!(config.min_points, 10);

        let slow = SwingPlaneConfig::for_frame_rate(1.0);
        assert_eq!(slow.impact_zone_frames, 1);

        let bogus = SwingPlaneConfig::for_frame_rate(-5.0);
        assert_eq!(bogus, SwingPlaneConfig::default());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SwingPlaneConfig::default()
            .with_impact_zone_weight(3.0)
            .with_min_points(5)
            .with_frame_order(FrameOrderPolicy::Strict);
        assert_eq!(config.impact_zone_weight, 3.0);
        assert_eq!(config.min_points, 5);
        assert_eq!(config.frame_order, FrameOrderPolicy::Strict);
    }
}
