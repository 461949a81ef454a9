//! Swing Plane Library
//!
//! Golf swing plane fitting and metrics from tracked club shaft positions.
//!
//! Given a frame-ordered sequence of 3D shaft samples (grip and club head),
//! this library fits best-estimate swing planes, splits the swing into
//! phases and derives attack angle, swing path, plane tilt, plane shift and
//! on-plane deviation.
//!
//! # Features
//!
//! - **Total least squares**: planes minimize perpendicular distance through
//!   a weighted 3x3 eigendecomposition
//! - **Impact weighting**: positions near impact pull the downswing plane
//! - **Phase detection**: address, backswing, top, downswing and impact from
//!   club head height and shaft steepness
//! - **Never panics on bad data**: the analyzer reports failures as values
//!
//! # Quick Start
//!
//! ```
//! use swing_plane::{Point3D, ShaftPosition, SwingPlaneAnalyzer};
//!
//! // Club head rises on screen (y decreasing), then comes back down
//! let positions: Vec<ShaftPosition> = (0..30)
//!     .map(|i: i64| {
//!         let t = i as f64 / 29.0;
//!         let y = (t - 0.5).abs();
//!         let z = 0.2 * (std::f64::consts::PI * t).sin();
//!         ShaftPosition::new(
//!             i,
//!             Point3D::new(0.5, 0.5 + y, z),
//!             Point3D::new(0.5 + 0.3 * (1.0 - 2.0 * t), 0.4 + y, z + 0.1),
//!             i as f64 / 30.0,
//!         )
//!     })
//!     .collect();
//!
//! let analysis = SwingPlaneAnalyzer::default().analyze(&positions);
//! if analysis.success {
//!     println!("plane angle: {:.1}", analysis.metrics.plane_angle);
//!     println!("attack angle: {:.1}", analysis.metrics.attack_angle);
//! } else {
//!     println!("analysis failed: {:?}", analysis.error_message);
//! }
//! ```
//!
//! # Coordinates
//!
//! | Axis | Direction |
//! |------|-----------|
//! | `x` | left to right |
//! | `y` | top to bottom (smaller is higher on screen) |
//! | `z` | depth, increasing toward the camera |
//!
//! # Presets
//!
//! Frame windows are tuned for 30 fps capture:
//!
//! ```
//! use swing_plane::{SwingPlaneAnalyzer, SwingPlaneConfig};
//!
//! let config = SwingPlaneConfig::for_frame_rate(120.0);
//! let analyzer = SwingPlaneAnalyzer::from_config(&config)?;
//! assert_eq!(analyzer.detector().calculator().impact_zone_frames(), 40);
//! # Ok::<(), swing_plane::SwingPlaneError>(())
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod analyzer;
pub mod calculator;
pub mod config;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod math;
pub mod metrics;
pub mod shaft;
pub mod validation;

// Re-exports for convenient access
pub use analyzer::{SwingPlaneAnalysis, SwingPlaneAnalyzer};
pub use calculator::PlaneCalculator;
pub use config::{FrameOrderPolicy, SwingPlaneConfig, REFERENCE_FRAME_RATE};
pub use detector::{PlaneDetector, SwingPlaneResult};
pub use error::{Result, SwingPlaneError};
pub use geometry::{
    angle_between_planes, fit_plane_svd, plane_line_intersection, weighted_plane_fit, Plane3D,
    Point3D,
};
pub use metrics::{PlaneMetrics, SwingMetrics};
pub use shaft::ShaftPosition;
pub use validation::{check_frame_order, enforce_frame_order, FrameOrderViolation};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
