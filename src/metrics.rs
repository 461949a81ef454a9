//! Golf metrics derived from a swing plane.
//!
//! All angles are in degrees. Coordinates follow the screen convention, so a
//! positive `y` component points down.

use crate::config::SwingPlaneConfig;
use crate::error::{Result, SwingPlaneError};
use crate::geometry::{Plane3D, NORMAL_EPS};
use crate::math::linalg::{angle_between_units, cross3, norm3, normalize3, reject3};
use crate::shaft::ShaftPosition;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference for attack angle: screen-space horizontal.
const HORIZONTAL_REFERENCE: [f64; 3] = [1.0, 0.0, 0.0];

/// Used when a direction has no horizontal (`x`, `z`) component.
const FALLBACK_HORIZONTAL: [f64; 3] = [0.0, 0.0, 1.0];

/// Complete swing plane metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwingMetrics {
    /// Positive when hitting up on the ball.
    pub attack_angle: f64,
    /// Negative when out-to-in.
    pub swing_path: f64,
    /// Plane tilt from horizontal.
    pub plane_angle: f64,
    /// Backswing to downswing plane shift.
    pub plane_shift: Option<f64>,

    pub max_deviation: f64,
    pub avg_deviation: f64,
    pub deviation_at_impact: f64,
}

impl SwingMetrics {
    /// All-zero metrics reported by a failed analysis.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            attack_angle: 0.0,
            swing_path: 0.0,
            plane_angle: 0.0,
            plane_shift: None,
            max_deviation: 0.0,
            avg_deviation: 0.0,
            deviation_at_impact: 0.0,
        }
    }
}

/// Computes attack angle, swing path and on-plane deviation.
///
/// Holds only the default target direction, so one instance can be shared
/// freely.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMetrics {
    target_direction: [f64; 3],
}

impl Default for PlaneMetrics {
    fn default() -> Self {
        Self {
            target_direction: [0.0, 1.0, 0.0],
        }
    }
}

impl PlaneMetrics {
    /// Create with a default target direction (normalized here).
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `target_direction` is zero or not finite.
    pub fn new(target_direction: [f64; 3]) -> Result<Self> {
        let norm = norm3(&target_direction);
        if !norm.is_finite() || norm < NORMAL_EPS {
            return Err(SwingPlaneError::invalid_config(
                "target_direction must be a non-zero finite vector",
            ));
        }
        Ok(Self {
            target_direction: normalize3(&target_direction),
        })
    }

    /// # Errors
    ///
    /// `InvalidConfig` if the target direction is unusable.
    pub fn from_config(config: &SwingPlaneConfig) -> Result<Self> {
        Self::new(config.target_direction)
    }

    #[must_use]
    pub const fn target_direction(&self) -> [f64; 3] {
        self.target_direction
    }

    /// Vertical angle of the shaft at impact, measured within the plane.
    ///
    /// The shaft direction and the horizontal reference `(1, 0, 0)` are both
    /// projected onto the plane. If the reference vanishes (the plane is
    /// perpendicular to `x`), `(0, 0, 1)` is used instead. The angle is
    /// negative when the projected shaft points down on screen.
    ///
    /// # Errors
    ///
    /// - `ZeroLengthShaft` if the shaft has no direction
    /// - `DegeneratePlane` if the plane normal is zero
    /// - `DegenerateProjection` if the shaft is perpendicular to the plane
    pub fn attack_angle(&self, impact_shaft: &ShaftPosition, plane: &Plane3D) -> Result<f64> {
        let shaft_dir = impact_shaft.direction()?;
        let normal = plane.normalize()?.normal_vector();

        let shaft_in_plane = reject3(&shaft_dir, &normal);
        if norm3(&shaft_in_plane) < NORMAL_EPS {
            return Err(SwingPlaneError::degenerate_projection(format!(
                "shaft at frame {} is perpendicular to the plane",
                impact_shaft.frame_number
            )));
        }
        let shaft_in_plane = normalize3(&shaft_in_plane);

        let mut reference = reject3(&HORIZONTAL_REFERENCE, &normal);
        if norm3(&reference) < NORMAL_EPS {
            reference = reject3(&FALLBACK_HORIZONTAL, &normal);
        }
        let reference = normalize3(&reference);

        let angle = angle_between_units(&shaft_in_plane, &reference);

        // +y is down on screen
        if shaft_in_plane[1] > 0.0 {
            Ok(-angle)
        } else {
            Ok(angle)
        }
    }

    /// Horizontal angle between club travel and the target line.
    ///
    /// Both directions are flattened onto the `x`/`z` ground plane. A target
    /// with no horizontal component is replaced by `(0, 0, 1)`. Returns 0.0
    /// for a purely vertical shaft.
    ///
    /// # Errors
    ///
    /// - `ZeroLengthShaft` if the shaft has no direction
    /// - `InvalidInput` if `target_direction` is not finite
    pub fn swing_path(
        &self,
        impact_shaft: &ShaftPosition,
        target_direction: Option<[f64; 3]>,
    ) -> Result<f64> {
        let target = target_direction.unwrap_or(self.target_direction);
        if target.iter().any(|c| !c.is_finite()) {
            return Err(SwingPlaneError::invalid_input(
                "target_direction must be finite",
            ));
        }

        let travel = impact_shaft.direction()?;
        let travel_horizontal = [travel[0], 0.0, travel[2]];
        if norm3(&travel_horizontal) < NORMAL_EPS {
            return Ok(0.0);
        }
        let travel_horizontal = normalize3(&travel_horizontal);

        let target_horizontal = [target[0], 0.0, target[2]];
        let target_horizontal = if norm3(&target_horizontal) < NORMAL_EPS {
            FALLBACK_HORIZONTAL
        } else {
            normalize3(&target_horizontal)
        };

        let angle = angle_between_units(&travel_horizontal, &target_horizontal);

        // Out-to-in swings the cross product toward -y
        let cross = cross3(&target_horizontal, &travel_horizontal);
        if cross[1] < 0.0 {
            Ok(-angle)
        } else {
            Ok(angle)
        }
    }

    /// Absolute distance from the shaft midpoint to the plane.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the plane normal is zero.
    pub fn on_plane_deviation(&self, shaft_position: &ShaftPosition, plane: &Plane3D) -> Result<f64> {
        Ok(plane.point_distance(&shaft_position.midpoint())?.abs())
    }

    /// Plane tilt from horizontal.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the plane normal is zero.
    pub fn plane_angle(&self, plane: &Plane3D) -> Result<f64> {
        plane.angle_to_horizontal()
    }

    /// On-plane deviation of every position, in input order.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the plane normal is zero.
    pub fn deviations(&self, shaft_positions: &[ShaftPosition], plane: &Plane3D) -> Result<Vec<f64>> {
        let plane = plane.normalize()?;
        shaft_positions
            .iter()
            .map(|pos| self.on_plane_deviation(pos, &plane))
            .collect()
    }

    /// Every metric for one swing against `plane`.
    ///
    /// Without `impact_position` the last position stands in for impact, so
    /// callers should pass positions in frame order.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `shaft_positions` is empty
    /// - any error from the individual metrics
    pub fn calculate_swing_metrics(
        &self,
        shaft_positions: &[ShaftPosition],
        plane: &Plane3D,
        impact_position: Option<&ShaftPosition>,
        plane_shift: Option<f64>,
    ) -> Result<SwingMetrics> {
        let Some(last) = shaft_positions.last() else {
            return Err(SwingPlaneError::invalid_input(
                "no shaft positions to measure",
            ));
        };
        let impact = impact_position.unwrap_or(last);

        let deviations = self.deviations(shaft_positions, plane)?;
        let max_deviation = deviations.iter().copied().fold(0.0, f64::max);
        let avg_deviation = deviations.iter().sum::<f64>() / deviations.len() as f64;

        Ok(SwingMetrics {
            attack_angle: self.attack_angle(impact, plane)?,
            swing_path: self.swing_path(impact, None)?,
            plane_angle: self.plane_angle(plane)?,
            plane_shift,
            max_deviation,
            avg_deviation,
            deviation_at_impact: self.on_plane_deviation(impact, plane)?,
        })
    }
}
