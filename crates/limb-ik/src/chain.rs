//! Kinematic chain extracted from a URDF [`RobotModel`].
//!
//! A [`KinematicChain`] is the ordered list of joints from a base link to a
//! tip link. Every joint on the path is kept, fixed ones included, because
//! the position-level solver needs their static transforms. Only actuated
//! joints take a slot in the constraint vectors; [`KinematicChain::dof`]
//! counts them.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, UnitVector3, Vector3};

use limb_urdf::{JointData, JointType, Origin, RobotModel};

use crate::error::ConfigError;
use crate::limits::JointBounds;

// ---------------------------------------------------------------------------
// JointAxis
// ---------------------------------------------------------------------------

/// How a joint moves along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointAxis {
    Rotational,
    Translational,
    Fixed,
    /// Joint kinds the chain cannot express with a single axis
    /// (floating, planar).
    Unknown,
}

impl JointAxis {
    /// Whether the joint takes a slot in the constraint vectors.
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Rotational | Self::Translational)
    }

    const fn from_joint_type(joint_type: JointType) -> Self {
        match joint_type {
            JointType::Revolute | JointType::Continuous => Self::Rotational,
            JointType::Prismatic => Self::Translational,
            JointType::Fixed => Self::Fixed,
            JointType::Floating | JointType::Planar => Self::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// ChainJoint
// ---------------------------------------------------------------------------

/// A single joint in the kinematic chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainJoint {
    /// Name of this joint (from URDF).
    pub name: String,
    /// Motion kind.
    pub axis_kind: JointAxis,
    /// Static transform from parent link frame to this joint frame.
    pub origin: Isometry3<f64>,
    /// Joint axis in the joint's local frame.
    pub axis: UnitVector3<f64>,
    /// Model-declared bounds. Continuous joints carry the sentinel extremes.
    pub limits: JointBounds,
    /// Safety-controller soft position limits `(lower, upper)`, if declared.
    pub safety: Option<(f64, f64)>,
}

impl ChainJoint {
    /// A joint at the identity origin, moving along Z, with zero limits.
    pub fn new(name: impl Into<String>, axis_kind: JointAxis) -> Self {
        Self {
            name: name.into(),
            axis_kind,
            origin: Isometry3::identity(),
            axis: Vector3::z_axis(),
            limits: JointBounds::new(0.0, 0.0, 0.0, 0.0),
            safety: None,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: JointBounds) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_safety(mut self, lower: f64, upper: f64) -> Self {
        self.safety = Some((lower, upper));
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Isometry3<f64>) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: UnitVector3<f64>) -> Self {
        self.axis = axis;
        self
    }

    fn from_joint_data(joint: &JointData) -> Self {
        let limits = &joint.limits;
        let bounds = match joint.joint_type {
            JointType::Continuous => JointBounds::continuous(limits.velocity, 0.0),
            _ => JointBounds::new(limits.lower, limits.upper, limits.velocity, 0.0),
        };
        let axis = Vector3::new(joint.axis[0], joint.axis[1], joint.axis[2]);

        Self {
            name: joint.name.clone(),
            axis_kind: JointAxis::from_joint_type(joint.joint_type),
            origin: origin_to_isometry(&joint.origin),
            axis: UnitVector3::try_new(axis, f64::EPSILON).unwrap_or_else(Vector3::z_axis),
            limits: bounds,
            safety: joint.safety.map(|s| (s.soft_lower, s.soft_upper)),
        }
    }
}

// ---------------------------------------------------------------------------
// KinematicChain
// ---------------------------------------------------------------------------

/// An ordered kinematic chain from base to tip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinematicChain {
    /// Ordered joints from base to tip, fixed joints included.
    joints: Vec<ChainJoint>,
}

impl KinematicChain {
    /// Build a chain from explicit joints, in base-to-tip order.
    pub const fn new(joints: Vec<ChainJoint>) -> Self {
        Self { joints }
    }

    /// Build the chain between `base_link` and `tip_link` of a model.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Model`] if either link is missing, and
    /// [`ConfigError::ChainNotFound`] if `tip_link` does not descend from
    /// `base_link`.
    pub fn from_model(
        model: &RobotModel,
        base_link: &str,
        tip_link: &str,
    ) -> Result<Self, ConfigError> {
        model.link(base_link)?;
        model.link(tip_link)?;

        let path = find_path_to_link(model, base_link, tip_link).ok_or_else(|| {
            ConfigError::ChainNotFound {
                base: base_link.into(),
                tip: tip_link.into(),
            }
        })?;

        let joints: Vec<ChainJoint> = path.into_iter().map(ChainJoint::from_joint_data).collect();
        tracing::debug!(
            base = base_link,
            tip = tip_link,
            segments = joints.len(),
            "extracted kinematic chain"
        );
        Ok(Self { joints })
    }

    /// Number of actuated degrees of freedom.
    pub fn dof(&self) -> usize {
        self.actuated_joints().count()
    }

    /// Number of joints on the path, fixed ones included.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Every joint on the path, in chain order.
    pub fn joints(&self) -> &[ChainJoint] {
        &self.joints
    }

    /// Actuated joints, in chain order. Index `i` of this iterator is slot
    /// `i` of every constraint vector.
    pub fn actuated_joints(&self) -> impl Iterator<Item = &ChainJoint> {
        self.joints.iter().filter(|j| j.axis_kind.is_actuated())
    }

    /// Actuated joint names in chain order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.actuated_joints().map(|j| j.name.as_str()).collect()
    }
}

/// Convert a URDF [`Origin`] (xyz + rpy) to an [`Isometry3`].
fn origin_to_isometry(origin: &Origin) -> Isometry3<f64> {
    let [x, y, z] = origin.xyz;
    let [roll, pitch, yaw] = origin.rpy;
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

/// Joints from `base` down to `target`, walking parent links up from the
/// target. Returns `None` when `target` does not descend from `base`.
fn find_path_to_link<'a>(
    model: &'a RobotModel,
    base: &str,
    target: &str,
) -> Option<Vec<&'a JointData>> {
    let mut path = Vec::new();
    let mut link = target;
    while link != base {
        // A well-formed tree never revisits a link.
        if path.len() >= model.joints.len() {
            return None;
        }
        let joint = model.parent_joint(link)?;
        path.push(joint);
        link = &joint.parent;
    }
    path.reverse();
    Some(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
