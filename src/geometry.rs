//! 3D plane geometry.
//!
//! Points use the camera/screen convention shared by the upstream shaft
//! reconstruction:
//!
//! | Axis | Negative | Positive |
//! |------|----------|----------|
//! | x | left | right |
//! | y | top of screen | bottom of screen |
//! | z | away from camera | toward camera |
//!
//! A smaller `y` is therefore *higher* on screen.
//!
//! Planes are stored in raw normal form `ax + by + cz + d = 0`. Every angle
//! and distance query normalizes first, so callers may pass unnormalized
//! coefficients.

use crate::error::{Result, SwingPlaneError};
use crate::math::linalg::{compute_weighted_axes, dot3, norm3, normalize3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Normal magnitude below which a plane is degenerate.
pub const NORMAL_EPS: f64 = 1e-10;

/// Screen-space "up" reference normal for a horizontal plane.
pub const HORIZONTAL_NORMAL: [f64; 3] = [0.0, 1.0, 0.0];

/// Point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinates as `[x, y, z]`.
    #[must_use]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Coordinates as an nalgebra vector.
    #[must_use]
    pub fn to_vector(&self) -> nalgebra::Vector3<f64> {
        nalgebra::Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        norm3(&[self.x - other.x, self.y - other.y, self.z - other.z])
    }
}

impl From<[f64; 3]> for Point3D {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Plane in normal form `ax + by + cz + d = 0`.
///
/// The normal `(a, b, c)` is not required to be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane3D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane3D {
    /// Create a plane from raw coefficients.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Raw normal vector `[a, b, c]`.
    #[must_use]
    pub const fn normal_vector(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// Plane with unit normal and `d` scaled consistently.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the normal magnitude is below [`NORMAL_EPS`].
    pub fn normalize(&self) -> Result<Self> {
        let magnitude = norm3(&self.normal_vector());

        // NaN coefficients must not slip through the comparison below
        if !magnitude.is_finite() || magnitude < NORMAL_EPS {
            return Err(SwingPlaneError::DegeneratePlane);
        }

        Ok(Self::new(
            self.a / magnitude,
            self.b / magnitude,
            self.c / magnitude,
            self.d / magnitude,
        ))
    }

    /// Signed perpendicular distance from `point` to the plane.
    ///
    /// Positive on the side the normal points to.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the normal is zero.
    pub fn point_distance(&self, point: &Point3D) -> Result<f64> {
        let n = self.normalize()?;
        Ok(n.a * point.x + n.b * point.y + n.c * point.z + n.d)
    }

    /// Closest point on the plane to `point`.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the normal is zero.
    pub fn project_point(&self, point: &Point3D) -> Result<Point3D> {
        let n = self.normalize()?;
        let dist = n.a * point.x + n.b * point.y + n.c * point.z + n.d;
        Ok(Point3D::new(
            point.x - dist * n.a,
            point.y - dist * n.b,
            point.z - dist * n.c,
        ))
    }

    /// Angle to horizontal ground in degrees (0 = flat, 90 = vertical).
    ///
    /// Independent of normal orientation.
    ///
    /// # Errors
    ///
    /// `DegeneratePlane` if the normal is zero.
    pub fn angle_to_horizontal(&self) -> Result<f64> {
        let normal = self.normalize()?.normal_vector();
        Ok(unsigned_angle(&normal, &HORIZONTAL_NORMAL))
    }

    /// Angle in degrees (0-90) between the plane normal and `target_direction`.
    ///
    /// # Errors
    ///
    /// - `DegeneratePlane` if the normal is zero
    /// - `InvalidInput` if `target_direction` is zero
    pub fn angle_to_target_line(&self, target_direction: [f64; 3]) -> Result<f64> {
        let normal = self.normalize()?.normal_vector();
        let target = unit_or_err(&target_direction, "target_direction")?;
        Ok(unsigned_angle(&normal, &target))
    }
}

/// `acos(|dot|)` in degrees for unit vectors.
fn unsigned_angle(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let cos_angle = dot3(a, b).clamp(-1.0, 1.0).abs();
    cos_angle.acos().to_degrees()
}

fn unit_or_err(v: &[f64; 3], name: &str) -> Result<[f64; 3]> {
    let norm = norm3(v);
    if !norm.is_finite() || norm < NORMAL_EPS {
        return Err(SwingPlaneError::invalid_input(format!(
            "{name} must be a non-zero vector"
        )));
    }
    Ok(normalize3(v))
}

/// Best-fit plane through `points` by total least squares.
///
/// The normal is the direction of least variance of the centered points (the
/// right singular vector of the smallest singular value); the plane passes
/// through the centroid.
///
/// # Errors
///
/// `InsufficientPoints` for fewer than 3 points.
pub fn fit_plane_svd(points: &[Point3D]) -> Result<Plane3D> {
    let weights = vec![1.0; points.len()];
    weighted_plane_fit(points, &weights)
}

/// Best-fit plane where each point's pull is scaled by its weight.
///
/// Weights are normalized to sum to 1; each centered point is scaled by
/// `sqrt(weight)` before the decomposition.
///
/// # Errors
///
/// - `LengthMismatch` if lengths differ
/// - `InsufficientPoints` for fewer than 3 points
/// - `NonPositiveWeight` if the weights sum to (near) zero
/// - `InvalidInput` for negative or non-finite weights
pub fn weighted_plane_fit(points: &[Point3D], weights: &[f64]) -> Result<Plane3D> {
    let coords: Vec<[f64; 3]> = points.iter().map(Point3D::to_array).collect();
    let axes = compute_weighted_axes(&coords, weights)?;

    let normal = axes.normal();
    let d = -dot3(&normal, &axes.centroid);

    Ok(Plane3D::new(normal[0], normal[1], normal[2], d))
}

/// Intersection of a plane with the line `line_point + t * line_direction`.
///
/// Returns `Ok(None)` when the line is parallel to the plane.
///
/// # Errors
///
/// `DegeneratePlane` if the plane normal is zero.
pub fn plane_line_intersection(
    plane: &Plane3D,
    line_point: &Point3D,
    line_direction: [f64; 3],
) -> Result<Option<Point3D>> {
    let n = plane.normalize()?;
    let normal = n.normal_vector();

    let denominator = dot3(&normal, &line_direction);
    if denominator.abs() < NORMAL_EPS {
        return Ok(None);
    }

    let t = -(dot3(&normal, &line_point.to_array()) + n.d) / denominator;

    Ok(Some(Point3D::new(
        line_point.x + t * line_direction[0],
        line_point.y + t * line_direction[1],
        line_point.z + t * line_direction[2],
    )))
}

/// Angle between two planes in degrees (0-90), independent of normal signs.
///
/// # Errors
///
/// `DegeneratePlane` if either normal is zero.
pub fn angle_between_planes(plane1: &Plane3D, plane2: &Plane3D) -> Result<f64> {
    let n1 = plane1.normalize()?.normal_vector();
    let n2 = plane2.normalize()?.normal_vector();
    Ok(unsigned_angle(&n1, &n2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn horizontal() -> Plane3D {
        Plane3D::new(0.0, 1.0, 0.0, 0.0)
    }

    #[test]
    fn test_point_distance_to() {
        let p1 = Point3D::new(0.0, 0.0, 0.0);
        let p2 = Point3D::new(1.0, 2.0, 2.0);
        assert_relative_eq!(p1.distance_to(&p2), 3.0);
        assert_relative_eq!(p2.distance_to(&p1), 3.0);
    }

    #[test]
    fn test_normalize() {
        let plane = Plane3D::new(3.0, 4.0, 0.0, 10.0);
        let n = plane.normalize().unwrap();
        assert_relative_eq!(n.a, 0.6);
        assert_relative_eq!(n.b, 0.8);
        assert_relative_eq!(n.d, 2.0);
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = Plane3D::new(-2.0, 7.0, 1.5, 3.0).normalize().unwrap();
        let twice = once.normalize().unwrap();
        assert_relative_eq!(once.a, twice.a, epsilon = 1e-12);
        assert_relative_eq!(once.b, twice.b, epsilon = 1e-12);
        assert_relative_eq!(once.c, twice.c, epsilon = 1e-12);
        assert_relative_eq!(once.d, twice.d, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_zero_normal() {
        let plane = Plane3D::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(plane.normalize(), Err(SwingPlaneError::DegeneratePlane));
        assert!(plane.point_distance(&Point3D::default()).is_err());
        assert!(plane.angle_to_horizontal().is_err());
    }

    #[test]
    fn test_point_distance_signed() {
        let plane = horizontal();
        assert_relative_eq!(plane.point_distance(&Point3D::new(0.0, 2.0, 0.0)).unwrap(), 2.0);
        assert_relative_eq!(plane.point_distance(&Point3D::new(5.0, -1.5, 3.0)).unwrap(), -1.5);

        // Unnormalized coefficients give the same distance
        let scaled = Plane3D::new(0.0, 4.0, 0.0, -2.0);
        assert_relative_eq!(scaled.point_distance(&Point3D::new(0.0, 1.5, 0.0)).unwrap(), 1.0);
    }

    #[test]
    fn test_project_point() {
        let plane = horizontal();
        let projected = plane.project_point(&Point3D::new(1.0, 5.0, 2.0)).unwrap();
        assert_relative_eq!(projected.x, 1.0);
        assert_relative_eq!(projected.y, 0.0);
        assert_relative_eq!(projected.z, 2.0);
        assert_abs_diff_eq!(plane.point_distance(&projected).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_to_horizontal() {
        assert_abs_diff_eq!(horizontal().angle_to_horizontal().unwrap(), 0.0, epsilon = 1e-9);

        let vertical = Plane3D::new(1.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(vertical.angle_to_horizontal().unwrap(), 90.0);

        let tilted = Plane3D::new(0.0, 1.0, 1.0, 0.0);
        assert_relative_eq!(tilted.angle_to_horizontal().unwrap(), 45.0, epsilon = 1e-9);

        // Flipped normal reports the same angle
        let flipped = Plane3D::new(0.0, -1.0, -1.0, 0.0);
        assert_relative_eq!(flipped.angle_to_horizontal().unwrap(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_to_target_line() {
        let plane = Plane3D::new(1.0, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(
            plane.angle_to_target_line([2.0, 0.0, 0.0]).unwrap(),
            0.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(plane.angle_to_target_line([0.0, 0.0, 1.0]).unwrap(), 90.0);
        assert!(plane.angle_to_target_line([0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_fit_horizontal_plane() {
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
            Point3D::new(1.0, 0.0, 1.0),
        ];
        let plane = fit_plane_svd(&points).unwrap();
        assert_abs_diff_eq!(plane.angle_to_horizontal().unwrap(), 0.0, epsilon = 1e-6);
        for p in &points {
            assert_abs_diff_eq!(plane.point_distance(p).unwrap(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fit_recovers_known_plane() {
        // z = 0.3x - 0.7y + 2 sampled on a grid
        let points: Vec<Point3D> = (0..5)
            .flat_map(|i| {
                (0..4).map(move |j| {
                    let x = f64::from(i) * 0.5 - 1.0;
                    let y = f64::from(j) * 0.75;
                    Point3D::new(x, y, 0.3 * x - 0.7 * y + 2.0)
                })
            })
            .collect();

        let plane = fit_plane_svd(&points).unwrap();
        for p in &points {
            assert_abs_diff_eq!(plane.point_distance(p).unwrap(), 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_fit_insufficient_points() {
        let points = vec![Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 0.0, 0.0)];
        assert_eq!(
            fit_plane_svd(&points),
            Err(SwingPlaneError::insufficient_points(3, 2))
        );
    }

    #[test]
    fn test_fit_noisy_points() {
        let offsets = [0.01, -0.02, 0.015, -0.01, 0.005, -0.012, 0.02, -0.004, 0.0];
        let points: Vec<Point3D> = offsets
            .iter()
            .enumerate()
            .map(|(i, &dy)| Point3D::new((i % 3) as f64, dy, (i / 3) as f64))
            .collect();

        let plane = fit_plane_svd(&points).unwrap();
        assert!(plane.angle_to_horizontal().unwrap() < 5.0);
    }

    #[test]
    fn test_intersection_perpendicular() {
        let hit = plane_line_intersection(
            &horizontal(),
            &Point3D::new(1.0, 5.0, 2.0),
            [0.0, -1.0, 0.0],
        )
        .unwrap()
        .unwrap();
        assert_relative_eq!(hit.x, 1.0);
        assert_abs_diff_eq!(hit.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(hit.z, 2.0);
    }

    #[test]
    fn test_intersection_angled() {
        let hit = plane_line_intersection(
            &Plane3D::new(0.0, 2.0, 0.0, -2.0),
            &Point3D::new(0.0, 0.0, 0.0),
            [1.0, 1.0, 0.0],
        )
        .unwrap()
        .unwrap();
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.y, 1.0);
    }

    #[test]
    fn test_intersection_parallel() {
        let hit = plane_line_intersection(
            &horizontal(),
            &Point3D::new(0.0, 1.0, 0.0),
            [1.0, 0.0, 1.0],
        )
        .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_angle_between_planes() {
        let p1 = horizontal();
        let p2 = Plane3D::new(1.0, 0.0, 0.0, 3.0);
        let p3 = Plane3D::new(0.0, 1.0, 1.0, 0.0);

        assert_abs_diff_eq!(angle_between_planes(&p1, &p1).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(angle_between_planes(&p1, &p2).unwrap(), 90.0);
        assert_relative_eq!(angle_between_planes(&p1, &p3).unwrap(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_between_planes_symmetric() {
        let p1 = Plane3D::new(0.2, 0.9, -0.4, 1.0);
        let p2 = Plane3D::new(-0.7, 0.1, 0.5, -2.0);
        let flipped = Plane3D::new(0.7, -0.1, -0.5, 2.0);

        let forward = angle_between_planes(&p1, &p2).unwrap();
        assert_relative_eq!(forward, angle_between_planes(&p2, &p1).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(forward, angle_between_planes(&p1, &flipped).unwrap(), epsilon = 1e-9);
        assert!((0.0..=90.0).contains(&forward));
    }

    #[test]
    fn test_weighted_fit_uniform_matches_unweighted() {
        let points = vec![
            Point3D::new(0.0, 0.1, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, -0.1, 1.0),
            Point3D::new(1.0, 0.05, 1.0),
            Point3D::new(0.5, 0.0, 0.5),
        ];
        let unweighted = fit_plane_svd(&points).unwrap();
        let weighted = weighted_plane_fit(&points, &[3.0; 5]).unwrap();
        assert_abs_diff_eq!(
            angle_between_planes(&unweighted, &weighted).unwrap(),
            0.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_weighted_fit_emphasis() {
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
            Point3D::new(0.5, 10.0, 0.5),
        ];
        let weights = [1.0, 1.0, 1.0, 0.01];

        let plane = weighted_plane_fit(&points, &weights).unwrap();

        for p in &points[..3] {
            assert!(plane.point_distance(p).unwrap().abs() < 1.0);
        }
    }

    #[test]
    fn test_weighted_fit_ignores_light_outlier() {
        let third = 10.0 / 3.0;
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(10.0, 0.0, 0.0),
            Point3D::new(0.0, 0.0, 10.0),
            Point3D::new(third, 2.0, third),
        ];
        let weights = [1.0, 1.0, 1.0, 0.01];

        let plane = weighted_plane_fit(&points, &weights).unwrap();

        for p in &points[..3] {
            assert!(plane.point_distance(p).unwrap().abs() < 1.0);
        }
        assert!(plane.point_distance(&points[3]).unwrap().abs() > 1.5);
        assert!(plane.angle_to_horizontal().unwrap() < 1.0);
    }

    #[test]
    fn test_weighted_fit_errors() {
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
        ];
        assert!(matches!(
            weighted_plane_fit(&points, &[1.0, 1.0]),
            Err(SwingPlaneError::LengthMismatch { .. })
        ));
        assert!(matches!(
            weighted_plane_fit(&points[..2], &[1.0, 1.0]),
            Err(SwingPlaneError::InsufficientPoints { .. })
        ));
        assert_eq!(
            weighted_plane_fit(&points, &[0.0, 0.0, 0.0]),
            Err(SwingPlaneError::NonPositiveWeight)
        );
        assert!(matches!(
            weighted_plane_fit(&points, &[1.0, -1.0, 1.0]),
            Err(SwingPlaneError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.5, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
            Point3D::new(1.0, 0.5, 1.0),
            Point3D::new(0.5, 0.25, 0.5),
        ];

        let first = fit_plane_svd(&points).unwrap().angle_to_horizontal().unwrap();
        for _ in 0..10 {
            let again = fit_plane_svd(&points).unwrap().angle_to_horizontal().unwrap();
            assert_eq!(first, again);
        }
        // Points satisfy y = 0.5x: normal ~ (0.5, -1, 0)
        assert_relative_eq!(first, (1.0f64 / 1.25f64.sqrt()).acos().to_degrees(), epsilon = 1e-6);
    }
}
