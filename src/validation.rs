//! Input validation for shaft position sequences.
//!
//! Phase detection assumes positions arrive in frame order. These helpers
//! find violations and apply a [`FrameOrderPolicy`] to them.

use tracing::warn;

use crate::config::FrameOrderPolicy;
use crate::error::{Result, SwingPlaneError};
use crate::shaft::ShaftPosition;

/// First place where frame numbers go backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOrderViolation {
    /// Index of the offending position.
    pub index: usize,
    /// Frame number of the position before it.
    pub previous_frame: i64,
    /// Frame number at `index`.
    pub frame: i64,
}

/// Index of the first position whose `frame_number` is lower than its
/// predecessor's. Repeated frame numbers are allowed.
#[must_use]
pub fn check_frame_order(shaft_positions: &[ShaftPosition]) -> Option<FrameOrderViolation> {
    shaft_positions
        .windows(2)
        .position(|pair| pair[1].frame_number < pair[0].frame_number)
        .map(|i| FrameOrderViolation {
            index: i + 1,
            previous_frame: shaft_positions[i].frame_number,
            frame: shaft_positions[i + 1].frame_number,
        })
}

/// Apply `policy` to out-of-order input.
///
/// # Errors
///
/// `InvalidInput` under [`FrameOrderPolicy::Strict`] when frames decrease.
pub fn enforce_frame_order(
    shaft_positions: &[ShaftPosition],
    policy: FrameOrderPolicy,
) -> Result<()> {
    let Some(violation) = check_frame_order(shaft_positions) else {
        return Ok(());
    };

    match policy {
        FrameOrderPolicy::Permissive => {
            warn!(
                index = violation.index,
                previous_frame = violation.previous_frame,
                frame = violation.frame,
                "shaft positions are not in frame order"
            );
            Ok(())
        }
        FrameOrderPolicy::Strict => Err(SwingPlaneError::invalid_input(format!(
            "frame numbers must not decrease: frame {} follows {} at index {}",
            violation.frame, violation.previous_frame, violation.index
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3D;

    fn positions(frames: &[i64]) -> Vec<ShaftPosition> {
        frames
            .iter()
            .map(|&f| {
                ShaftPosition::new(
                    f,
                    Point3D::new(0.0, 0.0, 0.0),
                    Point3D::new(1.0, 0.0, 0.0),
                    f as f64 / 30.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_ordered_input() {
        assert_eq!(check_frame_order(&positions(&[0, 1, 2, 5, 9])), None);
        assert_eq!(check_frame_order(&positions(&[3, 3, 4])), None);
        assert_eq!(check_frame_order(&[]), None);
        assert_eq!(check_frame_order(&positions(&[7])), None);
    }

    #[test]
    fn test_first_violation_reported() {
        let violation = check_frame_order(&positions(&[0, 1, 5, 4, 2])).unwrap();
        assert_eq!(
            violation,
            FrameOrderViolation {
                index: 3,
                previous_frame: 5,
                frame: 4,
            }
        );
    }

    #[test]
    fn test_policies() {
        let shuffled = positions(&[0, 2, 1]);
        assert!(enforce_frame_order(&shuffled, FrameOrderPolicy::Permissive).is_ok());

        let err = enforce_frame_order(&shuffled, FrameOrderPolicy::Strict).unwrap_err();
        assert!(matches!(err, SwingPlaneError::InvalidInput(_)));
        assert!(err.to_string().contains("index 2"));

        let ordered = positions(&[0, 1, 2]);
        assert!(enforce_frame_order(&ordered, FrameOrderPolicy::Strict).is_ok());
    }
}
