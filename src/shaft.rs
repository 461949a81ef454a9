//! Club shaft samples.

use crate::error::{Result, SwingPlaneError};
use crate::geometry::{Point3D, NORMAL_EPS};
use crate::math::linalg::norm3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Club shaft at one video frame, from grip (`base_point`) to club head
/// (`tip_point`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShaftPosition {
    /// Video frame index.
    pub frame_number: i64,
    /// Grip end.
    pub base_point: Point3D,
    /// Club head end.
    pub tip_point: Point3D,
    /// Capture time in seconds.
    pub timestamp: f64,
}

impl ShaftPosition {
    #[must_use]
    pub const fn new(
        frame_number: i64,
        base_point: Point3D,
        tip_point: Point3D,
        timestamp: f64,
    ) -> Self {
        Self {
            frame_number,
            base_point,
            tip_point,
            timestamp,
        }
    }

    /// Center of the shaft; the sample used for plane fitting.
    #[must_use]
    pub fn midpoint(&self) -> Point3D {
        Point3D::new(
            (self.base_point.x + self.tip_point.x) / 2.0,
            (self.base_point.y + self.tip_point.y) / 2.0,
            (self.base_point.z + self.tip_point.z) / 2.0,
        )
    }

    /// Raw base-to-tip vector.
    #[must_use]
    pub fn vector(&self) -> [f64; 3] {
        [
            self.tip_point.x - self.base_point.x,
            self.tip_point.y - self.base_point.y,
            self.tip_point.z - self.base_point.z,
        ]
    }

    /// Unit vector from base to tip.
    ///
    /// # Errors
    ///
    /// `ZeroLengthShaft` if base and tip coincide.
    pub fn direction(&self) -> Result<[f64; 3]> {
        let v = self.vector();
        let magnitude = norm3(&v);

        if !magnitude.is_finite() || magnitude < NORMAL_EPS {
            return Err(SwingPlaneError::zero_length_shaft(self.frame_number));
        }

        Ok([v[0] / magnitude, v[1] / magnitude, v[2] / magnitude])
    }

    /// Distance between base and tip.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.base_point.distance_to(&self.tip_point)
    }

    /// Shaft steepness in screen space, `|dy| / |dx|`.
    ///
    /// A shaft with `|dx| < 1e-6` counts as vertical and returns infinity.
    #[must_use]
    pub fn steepness(&self) -> f64 {
        let dx = (self.tip_point.x - self.base_point.x).abs();
        let dy = (self.tip_point.y - self.base_point.y).abs();

        if dx < 1e-6 {
            f64::INFINITY
        } else {
            dy / dx
        }
    }
}
