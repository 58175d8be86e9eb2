//! Seams to the numerical solver collaborators.
//!
//! The velocity-level solver turns task velocities into joint velocities
//! under the joint capabilities; the position-level solver iterates it to
//! reach a Cartesian pose. Both are supplied from outside through a
//! [`SolverFactory`]; this crate only builds, wires and calls them.
//!
//! ```text
//! SolverFactory ──► VelocitySolver ──(moved into)──► PositionSolver
//! ```

use nalgebra::{DVector, Isometry3, Vector3};

use crate::chain::KinematicChain;
use crate::config::SolveSettings;
use crate::constraints::ConstraintVectors;

/// Result code reported when a solve is attempted on a facade that never
/// finished initialization.
pub const NOT_READY: i32 = -1;

// ---------------------------------------------------------------------------
// Twist
// ---------------------------------------------------------------------------

/// Linear and angular components of a Cartesian velocity or tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twist {
    pub linear: Vector3<f64>,
    pub angular: Vector3<f64>,
}

impl Twist {
    pub const fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self { linear, angular }
    }

    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}

impl Default for Twist {
    fn default() -> Self {
        Self::zero()
    }
}

// ---------------------------------------------------------------------------
// IkSolution
// ---------------------------------------------------------------------------

/// What the position-level solver returned for one request.
///
/// `code >= 0` is the success family; negative codes are solver-specific
/// failures and are passed on uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct IkSolution {
    pub code: i32,
    pub joints: DVector<f64>,
}

impl IkSolution {
    pub const fn new(code: i32, joints: DVector<f64>) -> Self {
        Self { code, joints }
    }

    pub const fn is_success(&self) -> bool {
        self.code >= 0
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Velocity-level IK solver.
pub trait VelocitySolver {
    /// Install the per-joint capabilities. Each vector has one slot per
    /// actuated joint.
    fn set_joint_capabilities(
        &mut self,
        lower: &DVector<f64>,
        upper: &DVector<f64>,
        velocity: &DVector<f64>,
        acceleration: &DVector<f64>,
    );
}

/// Position-level IK solver.
pub trait PositionSolver {
    /// Solve for the joint configuration placing the chain tip at `target`,
    /// starting from `q_init`.
    fn cart_to_jnt(
        &mut self,
        q_init: &DVector<f64>,
        target: &Isometry3<f64>,
        tolerance: &Twist,
    ) -> IkSolution;
}

/// Builds the two collaborators.
///
/// The position solver takes ownership of the velocity solver it drives.
pub trait SolverFactory {
    type Velocity: VelocitySolver;
    type Position: PositionSolver;

    /// Build a velocity solver for `dof` joints running at `loop_period`
    /// seconds.
    fn velocity_solver(&self, dof: usize, loop_period: f64) -> Result<Self::Velocity, String>;

    /// Build a position solver over `chain`, driving `velocity`.
    fn position_solver(
        &self,
        chain: &KinematicChain,
        velocity: Self::Velocity,
        settings: &SolveSettings,
    ) -> Result<Self::Position, String>;
}

/// Install `bounds` on a velocity solver.
pub(crate) fn install_capabilities<V: VelocitySolver>(solver: &mut V, bounds: &ConstraintVectors) {
    solver.set_joint_capabilities(
        &bounds.lower,
        &bounds.upper,
        &bounds.velocity,
        &bounds.acceleration,
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
