//! Core data types for in-memory URDF representation.
//!
//! These types keep only what limit resolution and chain extraction need:
//! the joint tree, joint origins and axes, the declared `<limit>` values
//! and the optional `<safety_controller>` soft limits.

use std::collections::HashMap;

use crate::error::UrdfError;

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// URDF joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Rotation about a single axis, with position limits.
    Revolute,
    /// Unlimited rotation about a single axis.
    Continuous,
    /// Translation along an axis, with position limits.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
    /// Unconstrained 6-DOF joint (rarely used).
    Floating,
    /// Motion in a plane (rarely used).
    Planar,
}

impl JointType {
    /// Whether this joint type has actuatable degrees of freedom.
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }
}

// ---------------------------------------------------------------------------
// JointLimits
// ---------------------------------------------------------------------------

/// Declared `<limit>` values of a joint.
///
/// Values are taken verbatim from the model. A joint without a `<limit>`
/// element reports zeros, which is what URDF readers conventionally do.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointLimits {
    /// Lower position limit (rad or m).
    pub lower: f64,
    /// Upper position limit (rad or m).
    pub upper: f64,
    /// Maximum effort (Nm or N).
    pub effort: f64,
    /// Maximum velocity (rad/s or m/s).
    pub velocity: f64,
}

// ---------------------------------------------------------------------------
// SafetyLimits
// ---------------------------------------------------------------------------

/// Soft limits from a `<safety_controller>` element.
///
/// Only the soft position limits take part in bound resolution; the gains
/// are kept so the model round-trips what the file declared.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SafetyLimits {
    /// Soft lower position limit (rad or m).
    pub soft_lower: f64,
    /// Soft upper position limit (rad or m).
    pub soft_upper: f64,
    /// Position gain of the safety controller.
    pub k_position: f64,
    /// Velocity gain of the safety controller.
    pub k_velocity: f64,
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// A 3D pose specified as position + roll-pitch-yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Origin {
    /// Translation `[x, y, z]` in meters.
    pub xyz: [f64; 3],
    /// Rotation `[roll, pitch, yaw]` in radians.
    pub rpy: [f64; 3],
}

// ---------------------------------------------------------------------------
// LinkData
// ---------------------------------------------------------------------------

/// In-memory representation of a URDF link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkData {
    /// Link name.
    pub name: String,
}

impl LinkData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// JointData
// ---------------------------------------------------------------------------

/// In-memory representation of a URDF joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointData {
    /// Joint name.
    pub name: String,
    /// Joint type.
    pub joint_type: JointType,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
    /// Joint origin relative to parent link.
    pub origin: Origin,
    /// Joint axis (default `[1, 0, 0]` per URDF).
    pub axis: [f64; 3],
    /// Declared motion limits.
    pub limits: JointLimits,
    /// Safety-controller soft limits, if declared.
    pub safety: Option<SafetyLimits>,
}

// ---------------------------------------------------------------------------
// RobotModel
// ---------------------------------------------------------------------------

/// Complete in-memory representation of a URDF robot.
#[derive(Debug, Clone)]
pub struct RobotModel {
    /// Robot name.
    pub name: String,
    /// All links, keyed by name.
    pub links: HashMap<String, LinkData>,
    /// All joints, keyed by name.
    pub joints: HashMap<String, JointData>,
    /// Name of the root link (the one never referenced as a child).
    pub root_link: String,
}

impl RobotModel {
    /// Get a link by name.
    pub fn link(&self, name: &str) -> Result<&LinkData, UrdfError> {
        self.links
            .get(name)
            .ok_or_else(|| UrdfError::MissingLink(name.into()))
    }

    /// The joint whose child is `link`, if any.
    pub fn parent_joint(&self, link: &str) -> Option<&JointData> {
        self.joints.values().find(|j| j.child == link)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
