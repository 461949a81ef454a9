//! Swing phase segmentation and per-phase planes.
//!
//! Phases are derived from two landmark frames rather than tracked as state:
//!
//! | Phase | Positions |
//! |-------|-----------|
//! | address | `frame < first_frame + address_frames` |
//! | backswing | `frame <= top.frame` |
//! | downswing | `frame >= top.frame` (impact-weighted) |
//! | full swing | every position |
//!
//! The top frame belongs to both backswing and downswing. Each plane degrades
//! to `None` independently when its phase is too sparse.

use tracing::{debug, warn};

use crate::calculator::PlaneCalculator;
use crate::config::SwingPlaneConfig;
use crate::error::{Result, SwingPlaneError};
use crate::geometry::{angle_between_planes, Plane3D};
use crate::shaft::ShaftPosition;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Planes and landmarks detected for one swing.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwingPlaneResult {
    pub address_plane: Option<Plane3D>,
    pub backswing_plane: Option<Plane3D>,
    pub downswing_plane: Option<Plane3D>,
    pub full_swing_plane: Option<Plane3D>,

    pub impact_position: Option<ShaftPosition>,
    pub top_position: Option<ShaftPosition>,
}

impl SwingPlaneResult {
    /// Result with every field absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            address_plane: None,
            backswing_plane: None,
            downswing_plane: None,
            full_swing_plane: None,
            impact_position: None,
            top_position: None,
        }
    }

    /// Angle in degrees between the backswing and downswing planes.
    ///
    /// `None` if either plane is missing.
    #[must_use]
    pub fn plane_shift(&self) -> Option<f64> {
        let backswing = self.backswing_plane.as_ref()?;
        let downswing = self.downswing_plane.as_ref()?;
        angle_between_planes(backswing, downswing).ok()
    }
}

/// Splits a swing into phases and fits one plane per phase.
///
/// # Example
///
/// ```
/// use swing_plane::{PlaneDetector, Point3D, ShaftPosition};
///
/// // Club head rises for 15 frames, then falls
/// let positions: Vec<ShaftPosition> = (0..30)
///     .map(|i: i64| {
///         let y = if i < 15 { 0.8 - i as f64 * 0.05 } else { (i - 15) as f64 * 0.05 };
///         let tip_dy = if i < 15 { -0.1 } else { 0.1 };
///         ShaftPosition::new(
///             i,
///             Point3D::new(0.5, y, 0.0),
///             Point3D::new(0.8, y + tip_dy, 0.0),
///             i as f64 / 30.0,
///         )
///     })
///     .collect();
///
/// let result = PlaneDetector::default().detect_swing_planes(&positions);
/// assert_eq!(result.top_position.map(|p| p.frame_number), Some(14));
/// assert!(result.downswing_plane.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneDetector {
    calculator: PlaneCalculator,
    min_phase_points: usize,
    address_frames: u32,
}

impl Default for PlaneDetector {
    fn default() -> Self {
        let config = SwingPlaneConfig::default();
        Self {
            calculator: PlaneCalculator::default(),
            min_phase_points: config.min_phase_points,
            address_frames: config.address_frames,
        }
    }
}

impl PlaneDetector {
    /// Create a detector around `calculator`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `min_phase_points < 3`.
    pub fn new(calculator: PlaneCalculator, min_phase_points: usize) -> Result<Self> {
        if min_phase_points < 3 {
            return Err(SwingPlaneError::invalid_config(format!(
                "min_phase_points must be >= 3, got {min_phase_points}"
            )));
        }

        debug!(min_phase_points, "initialized plane detector");

        Ok(Self {
            calculator,
            min_phase_points,
            address_frames: SwingPlaneConfig::default().address_frames,
        })
    }

    /// Create a detector and its calculator from a config.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the config fails validation.
    pub fn from_config(config: &SwingPlaneConfig) -> Result<Self> {
        config.validate()?;
        let detector = Self::new(PlaneCalculator::from_config(config)?, config.min_phase_points)?;
        detector.with_address_frames(config.address_frames)
    }

    /// Set the address window length.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `frames` is 0, matching `SwingPlaneConfig::validate`.
    pub fn with_address_frames(mut self, frames: u32) -> Result<Self> {
        if frames < 1 {
            return Err(SwingPlaneError::invalid_config(
                "address_frames must be >= 1, got 0",
            ));
        }
        self.address_frames = frames;
        Ok(self)
    }

    #[must_use]
    pub const fn calculator(&self) -> &PlaneCalculator {
        &self.calculator
    }

    #[must_use]
    pub const fn min_phase_points(&self) -> usize {
        self.min_phase_points
    }

    #[must_use]
    pub const fn address_frames(&self) -> u32 {
        self.address_frames
    }

    /// Detect landmarks and fit a plane for every phase.
    ///
    /// Never fails: each field of the result is `None` when its
    /// preconditions are not met. Without a detectable top, backswing and
    /// downswing fall back to the full-swing plane.
    #[must_use]
    pub fn detect_swing_planes(&self, shaft_positions: &[ShaftPosition]) -> SwingPlaneResult {
        if shaft_positions.len() < self.min_phase_points {
            warn!(
                count = shaft_positions.len(),
                min_phase_points = self.min_phase_points,
                "insufficient shaft positions for phase detection"
            );
            return SwingPlaneResult::empty();
        }

        let top_position = self.find_top_position(shaft_positions).copied();
        let impact_position = self.find_impact_position(shaft_positions).copied();

        debug!(
            top_frame = top_position.map(|p| p.frame_number),
            impact_frame = impact_position.map(|p| p.frame_number),
            "detected swing landmarks"
        );

        let full_swing_plane = self.fit(shaft_positions, None, "full swing");

        let (address_plane, backswing_plane, downswing_plane) = match top_position {
            Some(top) => {
                let address = self.address_positions(shaft_positions, self.address_frames);

                let backswing: Vec<ShaftPosition> = shaft_positions
                    .iter()
                    .filter(|pos| pos.frame_number <= top.frame_number)
                    .copied()
                    .collect();

                let downswing: Vec<ShaftPosition> = shaft_positions
                    .iter()
                    .filter(|pos| pos.frame_number >= top.frame_number)
                    .copied()
                    .collect();

                (
                    self.fit_phase(&address, None, "address"),
                    self.fit_phase(&backswing, None, "backswing"),
                    self.fit_phase(
                        &downswing,
                        impact_position.map(|p| p.frame_number),
                        "downswing",
                    ),
                )
            }
            None => (None, full_swing_plane, full_swing_plane),
        };

        SwingPlaneResult {
            address_plane,
            backswing_plane,
            downswing_plane,
            full_swing_plane,
            impact_position,
            top_position,
        }
    }

    /// Top of the backswing: the position whose club head is highest on
    /// screen (minimum tip `y`). Ties go to the earliest position.
    ///
    /// `None` for fewer than 3 positions.
    #[must_use]
    pub fn find_top_position<'a>(
        &self,
        shaft_positions: &'a [ShaftPosition],
    ) -> Option<&'a ShaftPosition> {
        if shaft_positions.len() < 3 {
            return None;
        }

        let mut min_y = f64::INFINITY;
        let mut top = None;
        for pos in shaft_positions {
            if pos.tip_point.y < min_y {
                min_y = pos.tip_point.y;
                top = Some(pos);
            }
        }
        top
    }

    /// Impact: the steepest shaft (`|dy| / |dx|`) strictly after the top.
    ///
    /// This approximates impact as the most vertical shaft in the downswing;
    /// it does not look at club head speed. Shafts with zero steepness never
    /// qualify, so a perfectly flat downswing has no impact.
    ///
    /// `None` if there is no top or no position after it.
    #[must_use]
    pub fn find_impact_position<'a>(
        &self,
        shaft_positions: &'a [ShaftPosition],
    ) -> Option<&'a ShaftPosition> {
        let top = self.find_top_position(shaft_positions)?;

        let mut max_steepness = 0.0;
        let mut impact = None;
        for pos in shaft_positions
            .iter()
            .filter(|pos| pos.frame_number > top.frame_number)
        {
            let steepness = pos.steepness();
            if steepness > max_steepness {
                max_steepness = steepness;
                impact = Some(pos);
            }
        }
        impact
    }

    /// Positions within `num_frames` of the first position's frame.
    #[must_use]
    pub fn address_positions(
        &self,
        shaft_positions: &[ShaftPosition],
        num_frames: u32,
    ) -> Vec<ShaftPosition> {
        let Some(first) = shaft_positions.first() else {
            return Vec::new();
        };

        let address_end = first.frame_number.saturating_add(i64::from(num_frames));
        shaft_positions
            .iter()
            .filter(|pos| pos.frame_number < address_end)
            .copied()
            .collect()
    }

    fn fit_phase(
        &self,
        positions: &[ShaftPosition],
        impact_frame: Option<i64>,
        phase: &'static str,
    ) -> Option<Plane3D> {
        if positions.len() < self.min_phase_points {
            debug!(phase, count = positions.len(), "phase too short for plane");
            return None;
        }
        self.fit(positions, impact_frame, phase)
    }

    fn fit(
        &self,
        positions: &[ShaftPosition],
        impact_frame: Option<i64>,
        phase: &'static str,
    ) -> Option<Plane3D> {
        match self.calculator.calculate_plane(positions, impact_frame) {
            Ok(plane) => plane,
            Err(err) => {
                warn!(phase, error = %err, "plane fit failed");
                None
            }
        }
    }
}
