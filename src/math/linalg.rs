//! Linear algebra utilities for plane fitting.
//!
//! This module provides the weighted scatter-matrix eigendecomposition used
//! for total-least-squares plane fits, plus small 3-vector helpers.

use crate::error::{Result, SwingPlaneError};
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Result of a weighted principal axis decomposition of 3D points.
#[derive(Debug, Clone)]
pub struct PrincipalAxes {
    /// Weighted centroid of the input points.
    pub centroid: [f64; 3],

    /// Eigenvalues sorted in descending order.
    pub eigenvalues: [f64; 3],

    /// Unit eigenvectors matching `eigenvalues` order.
    pub axes: [[f64; 3]; 3],
}

impl PrincipalAxes {
    /// Axis of least variance (the best-fit plane normal).
    #[must_use]
    pub fn normal(&self) -> [f64; 3] {
        self.axes[2]
    }
}

/// Compute the weighted principal axes of 3D points.
///
/// Weights are normalized to sum to 1. Each centered point is scaled by the
/// square root of its weight before the scatter matrix is accumulated, so the
/// eigenvectors match the right singular vectors of the weighted, centered
/// point matrix.
///
/// # Errors
///
/// - `LengthMismatch` if `points` and `weights` differ in length
/// - `InsufficientPoints` for fewer than 3 points
/// - `NonPositiveWeight` if the weights sum to (near) zero
pub fn compute_weighted_axes(points: &[[f64; 3]], weights: &[f64]) -> Result<PrincipalAxes> {
    if points.len() != weights.len() {
        return Err(SwingPlaneError::length_mismatch(points.len(), weights.len()));
    }

    if points.len() < 3 {
        return Err(SwingPlaneError::insufficient_points(3, points.len()));
    }

    if points.iter().flatten().any(|c| !c.is_finite()) {
        return Err(SwingPlaneError::invalid_input(
            "point coordinates must be finite",
        ));
    }

    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(SwingPlaneError::invalid_input(format!(
            "weights must be finite and non-negative, got {bad}"
        )));
    }

    let weight_sum: f64 = weights.iter().sum();
    if !(weight_sum.is_finite() && weight_sum >= 1e-10) {
        return Err(SwingPlaneError::NonPositiveWeight);
    }

    let mut centroid = [0.0f64; 3];
    for (point, &w) in points.iter().zip(weights.iter()) {
        let nw = w / weight_sum;
        for k in 0..3 {
            centroid[k] += point[k] * nw;
        }
    }

    // C = sum_i (sqrt(w_i) * x_i)(sqrt(w_i) * x_i)^T over centered points
    let mut scatter = Matrix3::<f64>::zeros();
    for (point, &w) in points.iter().zip(weights.iter()) {
        let sqrt_w = (w / weight_sum).sqrt();
        let weighted = Vector3::new(
            (point[0] - centroid[0]) * sqrt_w,
            (point[1] - centroid[1]) * sqrt_w,
            (point[2] - centroid[2]) * sqrt_w,
        );
        scatter += weighted * weighted.transpose();
    }

    let eigen = SymmetricEigen::new(scatter);

    let mut pairs: Vec<(f64, Vector3<f64>)> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, eigen.eigenvectors.column(i).into_owned()))
        .collect();

    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let eigenvalues = [pairs[0].0, pairs[1].0, pairs[2].0];
    let axes = [
        unit_array(&pairs[0].1),
        unit_array(&pairs[1].1),
        unit_array(&pairs[2].1),
    ];

    Ok(PrincipalAxes {
        centroid,
        eigenvalues,
        axes,
    })
}

fn unit_array(v: &Vector3<f64>) -> [f64; 3] {
    normalize3(&[v.x, v.y, v.z])
}

/// Normalize a 3D vector to unit length.
///
/// Returns the zero vector if the input norm is below `1e-10`.
#[must_use]
pub fn normalize3(v: &[f64; 3]) -> [f64; 3] {
    let norm = norm3(v);
    if norm < 1e-10 {
        return [0.0, 0.0, 0.0];
    }
    [v[0] / norm, v[1] / norm, v[2] / norm]
}

/// Compute the norm of a 3D vector.
#[must_use]
#[inline]
pub fn norm3(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Dot product of two 3D vectors.
#[must_use]
#[inline]
pub fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product of two 3D vectors.
#[must_use]
#[inline]
pub fn cross3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Remove the component of `v` along the unit vector `normal`.
#[must_use]
#[inline]
pub fn reject3(v: &[f64; 3], normal: &[f64; 3]) -> [f64; 3] {
    let along = dot3(v, normal);
    [
        v[0] - along * normal[0],
        v[1] - along * normal[1],
        v[2] - along * normal[2],
    ]
}

/// Angle in degrees between two unit vectors, clamped against rounding.
#[must_use]
#[inline]
pub fn angle_between_units(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    dot3(a, b).clamp(-1.0, 1.0).acos().to_degrees()
}
