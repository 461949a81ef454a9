//! Top-level swing analysis.
//!
//! [`SwingPlaneAnalyzer`] runs phase detection and metrics in one call and
//! never returns an error: every failure is reported in the returned
//! [`SwingPlaneAnalysis`] with `success = false` and a readable message.

use tracing::{debug, error, warn};

use crate::config::{FrameOrderPolicy, SwingPlaneConfig};
use crate::detector::{PlaneDetector, SwingPlaneResult};
use crate::error::Result;
use crate::geometry::Plane3D;
use crate::metrics::{PlaneMetrics, SwingMetrics};
use crate::shaft::ShaftPosition;
use crate::validation::enforce_frame_order;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const NO_POSITIONS: &str = "No shaft positions provided";
const NO_PLANE: &str = "Could not calculate swing plane";

/// Complete analysis of one swing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwingPlaneAnalysis {
    pub planes: SwingPlaneResult,
    pub metrics: SwingMetrics,
    /// On-plane deviation per input position, in input order.
    pub deviations: Vec<f64>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl SwingPlaneAnalysis {
    /// Failed analysis: zeroed metrics and no deviations.
    #[must_use]
    pub fn failure(planes: SwingPlaneResult, message: impl Into<String>) -> Self {
        Self {
            planes,
            metrics: SwingMetrics::zeroed(),
            deviations: Vec::new(),
            success: false,
            error_message: Some(message.into()),
        }
    }

    fn succeeded(planes: SwingPlaneResult, metrics: SwingMetrics, deviations: Vec<f64>) -> Self {
        Self {
            planes,
            metrics,
            deviations,
            success: true,
            error_message: None,
        }
    }
}

/// Detector plus metrics behind a single non-failing entry point.
///
/// Holds only immutable configuration, so one analyzer can serve many
/// threads at once.
///
/// # Example
///
/// ```
/// use swing_plane::{Plane3D, Point3D, ShaftPosition, SwingPlaneAnalyzer};
///
/// let positions: Vec<ShaftPosition> = (0..12)
///     .map(|i: i64| {
///         let y = 0.5 + 0.01 * i as f64;
///         ShaftPosition::new(
///             i,
///             Point3D::new(0.1 * i as f64, y, 0.0),
///             Point3D::new(0.1 * i as f64 + 0.3, y, 0.2),
///             i as f64 / 30.0,
///         )
///     })
///     .collect();
///
/// let ideal = Plane3D::new(0.0, 1.0, 0.0, -0.5);
/// let analysis = SwingPlaneAnalyzer::default().analyze_with_plane(&positions, &ideal, None);
/// assert!(analysis.success);
/// assert_eq!(analysis.deviations.len(), positions.len());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwingPlaneAnalyzer {
    detector: PlaneDetector,
    metrics: PlaneMetrics,
    frame_order: FrameOrderPolicy,
}

impl SwingPlaneAnalyzer {
    #[must_use]
    pub fn new(detector: PlaneDetector, metrics: PlaneMetrics) -> Self {
        debug!("initialized swing plane analyzer");
        Self {
            detector,
            metrics,
            frame_order: FrameOrderPolicy::default(),
        }
    }

    /// Build the full component stack from a config.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the config fails validation.
    pub fn from_config(config: &SwingPlaneConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = Self::new(
            PlaneDetector::from_config(config)?,
            PlaneMetrics::from_config(config)?,
        );
        Ok(analyzer.with_frame_order(config.frame_order))
    }

    #[must_use]
    pub const fn with_frame_order(mut self, policy: FrameOrderPolicy) -> Self {
        self.frame_order = policy;
        self
    }

    #[must_use]
    pub const fn detector(&self) -> &PlaneDetector {
        &self.detector
    }

    #[must_use]
    pub const fn metrics(&self) -> &PlaneMetrics {
        &self.metrics
    }

    #[must_use]
    pub const fn frame_order(&self) -> FrameOrderPolicy {
        self.frame_order
    }

    /// Detect swing planes and measure the swing against the downswing
    /// plane, or the full-swing plane when there is no downswing.
    #[must_use]
    pub fn analyze(&self, shaft_positions: &[ShaftPosition]) -> SwingPlaneAnalysis {
        if shaft_positions.is_empty() {
            return SwingPlaneAnalysis::failure(SwingPlaneResult::empty(), NO_POSITIONS);
        }

        if let Err(err) = enforce_frame_order(shaft_positions, self.frame_order) {
            error!(error = %err, "swing plane analysis failed");
            return SwingPlaneAnalysis::failure(SwingPlaneResult::empty(), err.to_string());
        }

        let planes = self.detector.detect_swing_planes(shaft_positions);

        let Some(plane) = planes.downswing_plane.or(planes.full_swing_plane) else {
            warn!(count = shaft_positions.len(), "no swing plane could be fitted");
            return SwingPlaneAnalysis::failure(planes, NO_PLANE);
        };

        match self.measure(
            shaft_positions,
            &plane,
            planes.impact_position.as_ref(),
            planes.plane_shift(),
        ) {
            Ok((metrics, deviations)) => {
                debug!(
                    plane_angle = metrics.plane_angle,
                    attack_angle = metrics.attack_angle,
                    swing_path = metrics.swing_path,
                    "swing analysis complete"
                );
                SwingPlaneAnalysis::succeeded(planes, metrics, deviations)
            }
            Err(err) => {
                error!(error = %err, "swing plane analysis failed");
                SwingPlaneAnalysis::failure(planes, err.to_string())
            }
        }
    }

    /// Measure the swing against a caller-supplied plane, skipping detection.
    ///
    /// Impact is the position at `impact_frame` when one matches, else the
    /// last position. The supplied plane is reported as `full_swing_plane`.
    #[must_use]
    pub fn analyze_with_plane(
        &self,
        shaft_positions: &[ShaftPosition],
        plane: &Plane3D,
        impact_frame: Option<i64>,
    ) -> SwingPlaneAnalysis {
        let mut planes = SwingPlaneResult {
            full_swing_plane: Some(*plane),
            ..SwingPlaneResult::empty()
        };

        if shaft_positions.is_empty() {
            return SwingPlaneAnalysis::failure(planes, NO_POSITIONS);
        }

        if let Err(err) = enforce_frame_order(shaft_positions, self.frame_order) {
            error!(error = %err, "swing plane analysis failed");
            return SwingPlaneAnalysis::failure(planes, err.to_string());
        }

        let impact = impact_frame
            .and_then(|frame| shaft_positions.iter().find(|pos| pos.frame_number == frame))
            .or_else(|| shaft_positions.last());

        match self.measure(shaft_positions, plane, impact, None) {
            Ok((metrics, deviations)) => {
                planes.impact_position = impact.copied();
                SwingPlaneAnalysis::succeeded(planes, metrics, deviations)
            }
            Err(err) => {
                error!(error = %err, "swing plane analysis failed");
                SwingPlaneAnalysis::failure(planes, err.to_string())
            }
        }
    }

    fn measure(
        &self,
        shaft_positions: &[ShaftPosition],
        plane: &Plane3D,
        impact: Option<&ShaftPosition>,
        plane_shift: Option<f64>,
    ) -> Result<(SwingMetrics, Vec<f64>)> {
        let metrics =
            self.metrics
                .calculate_swing_metrics(shaft_positions, plane, impact, plane_shift)?;
        let deviations = self.metrics.deviations(shaft_positions, plane)?;
        Ok((metrics, deviations))
    }
}
