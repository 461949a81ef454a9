//! Mathematical utilities for swing plane fitting.
//!
//! This module provides:
//! - [`linalg`]: weighted principal axes and 3-vector helpers

pub mod linalg;

pub use linalg::{compute_weighted_axes, PrincipalAxes};
