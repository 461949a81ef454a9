//! Best-fit swing plane from club shaft positions.
//!
//! The plane is fitted through shaft midpoints. When the impact frame is
//! known, positions within the impact zone get extra regression weight so the
//! plane follows the club where it matters most for ball flight, without
//! discarding the rest of the trajectory.

use tracing::{debug, warn};

use crate::config::SwingPlaneConfig;
use crate::error::{Result, SwingPlaneError};
use crate::geometry::{fit_plane_svd, weighted_plane_fit, Plane3D, Point3D};
use crate::shaft::ShaftPosition;

/// Fits a single plane to a set of shaft positions.
///
/// # Example
///
/// ```
/// use swing_plane::{PlaneCalculator, Point3D, ShaftPosition};
///
/// let positions: Vec<ShaftPosition> = (0..20)
///     .map(|i| {
///         let t = f64::from(i) * 0.3;
///         let base = Point3D::new(t.cos(), 0.0, t.sin());
///         let tip = Point3D::new(1.5 * t.cos(), 0.0, 1.5 * t.sin());
///         ShaftPosition::new(i64::from(i), base, tip, f64::from(i) / 30.0)
///     })
///     .collect();
///
/// let calculator = PlaneCalculator::new(2.0, 10, 10)?;
/// let plane = calculator.calculate_plane(&positions, Some(15))?.expect("enough points");
/// assert!(plane.angle_to_horizontal()? < 1e-6);
/// # Ok::<(), swing_plane::SwingPlaneError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneCalculator {
    impact_zone_weight: f64,
    impact_zone_frames: u32,
    min_points: usize,
}

impl Default for PlaneCalculator {
    fn default() -> Self {
        let config = SwingPlaneConfig::default();
        Self {
            impact_zone_weight: config.impact_zone_weight,
            impact_zone_frames: config.impact_zone_frames,
            min_points: config.min_points,
        }
    }
}

impl PlaneCalculator {
    /// Create a calculator.
    ///
    /// # Arguments
    ///
    /// * `impact_zone_weight` - Weight for positions near impact (>= 1.0)
    /// * `impact_zone_frames` - Frames on either side of impact to weight (>= 1)
    /// * `min_points` - Minimum positions required to fit (>= 3)
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if any parameter is out of range.
    pub fn new(impact_zone_weight: f64, impact_zone_frames: u32, min_points: usize) -> Result<Self> {
        if impact_zone_weight.is_nan() || impact_zone_weight < 1.0 {
            return Err(SwingPlaneError::invalid_config(format!(
                "impact_zone_weight must be >= 1.0, got {impact_zone_weight}"
            )));
        }
        if impact_zone_frames < 1 {
            return Err(SwingPlaneError::invalid_config(
                "impact_zone_frames must be >= 1, got 0",
            ));
        }
        if min_points < 3 {
            return Err(SwingPlaneError::invalid_config(format!(
                "min_points must be >= 3, got {min_points}"
            )));
        }

        debug!(
            impact_zone_weight,
            impact_zone_frames, min_points, "initialized plane calculator"
        );

        Ok(Self {
            impact_zone_weight,
            impact_zone_frames,
            min_points,
        })
    }

    /// Create a calculator from the fitting section of a config.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if any fitting parameter is out of range.
    pub fn from_config(config: &SwingPlaneConfig) -> Result<Self> {
        Self::new(
            config.impact_zone_weight,
            config.impact_zone_frames,
            config.min_points,
        )
    }

    #[must_use]
    pub const fn impact_zone_weight(&self) -> f64 {
        self.impact_zone_weight
    }

    #[must_use]
    pub const fn impact_zone_frames(&self) -> u32 {
        self.impact_zone_frames
    }

    #[must_use]
    pub const fn min_points(&self) -> usize {
        self.min_points
    }

    /// Fit a plane through the midpoints of `shaft_positions`.
    ///
    /// With `impact_frame`, positions within `impact_zone_frames` of it are
    /// weighted by `impact_zone_weight`; otherwise the fit is unweighted.
    ///
    /// Returns `Ok(None)` when fewer than `min_points` positions are given.
    ///
    /// # Errors
    ///
    /// Propagates fitting errors, e.g. `InvalidInput` for non-finite
    /// coordinates.
    pub fn calculate_plane(
        &self,
        shaft_positions: &[ShaftPosition],
        impact_frame: Option<i64>,
    ) -> Result<Option<Plane3D>> {
        if shaft_positions.len() < self.min_points {
            warn!(
                count = shaft_positions.len(),
                min_points = self.min_points,
                "insufficient shaft positions for plane fit"
            );
            return Ok(None);
        }

        let points: Vec<Point3D> = shaft_positions.iter().map(ShaftPosition::midpoint).collect();

        let plane = match impact_frame {
            Some(frame) => {
                let weights = self.impact_weights(shaft_positions, frame);
                weighted_plane_fit(&points, &weights)?
            }
            None => fit_plane_svd(&points)?,
        };

        Ok(Some(plane))
    }

    /// Per-position weights for an impact at `impact_frame`.
    ///
    /// `impact_zone_weight` within `impact_zone_frames` frames (inclusive),
    /// 1.0 elsewhere.
    #[must_use]
    pub fn impact_weights(&self, shaft_positions: &[ShaftPosition], impact_frame: i64) -> Vec<f64> {
        shaft_positions
            .iter()
            .map(|pos| {
                let distance = pos.frame_number.abs_diff(impact_frame);
                if distance <= u64::from(self.impact_zone_frames) {
                    self.impact_zone_weight
                } else {
                    1.0
                }
            })
            .collect()
    }

    /// Weighted fit over raw points.
    ///
    /// # Errors
    ///
    /// - `InsufficientPoints` below `min_points`
    /// - any error from [`weighted_plane_fit`]
    pub fn calculate_weighted_plane(&self, points: &[Point3D], weights: &[f64]) -> Result<Plane3D> {
        if points.len() < self.min_points {
            return Err(SwingPlaneError::insufficient_points(
                self.min_points,
                points.len(),
            ));
        }

        weighted_plane_fit(points, weights)
    }
}
