//! Joint motion-type classification.

use crate::chain::{JointAxis, KinematicChain};
use crate::limits::{CONTINUOUS_LOWER, CONTINUOUS_UPPER};

/// Motion type of an actuated joint, as the velocity-level solver sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Bounded rotation.
    Revolute,
    /// Unbounded rotation.
    Continuous,
    /// Translation.
    Prismatic,
}

/// Classify one joint from its axis kind and resolved position bounds.
///
/// Returns `None` for fixed and unknown joints, which take no slot.
pub fn classify(axis: JointAxis, lower: f64, upper: f64) -> Option<JointType> {
    match axis {
        JointAxis::Rotational if lower <= CONTINUOUS_LOWER && upper >= CONTINUOUS_UPPER => {
            Some(JointType::Continuous)
        }
        JointAxis::Rotational => Some(JointType::Revolute),
        JointAxis::Translational => Some(JointType::Prismatic),
        JointAxis::Fixed | JointAxis::Unknown => None,
    }
}

/// Classify every actuated joint of `chain` against the resolved bound
/// vectors.
///
/// Stops at the first actuated joint that has no bound slot, so a short
/// bound vector yields a short classification.
pub fn classify_chain(chain: &KinematicChain, lower: &[f64], upper: &[f64]) -> Vec<JointType> {
    chain
        .actuated_joints()
        .zip(lower.iter().zip(upper))
        .filter_map(|(joint, (&lo, &hi))| classify(joint.axis_kind, lo, hi))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
