//! URDF parsing and robot model representation for limb.
//!
//! Provides the model side of IK initialization: the joint tree, each
//! joint's declared limits, and the optional safety-controller soft limits
//! that tighten them.

pub mod error;
pub mod parser;
pub mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::UrdfError;
pub use parser::{parse_file, parse_string};
pub use types::{
    JointData, JointLimits, JointType, LinkData, Origin, RobotModel, SafetyLimits,
};
