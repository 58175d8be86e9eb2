//! The IK solver facade.
//!
//! [`IkFacade`] is built once, either from a robot model (bounds resolved
//! from the model, its safety controllers and a [`LimitStore`]) or from an
//! explicit chain and bound vectors. Construction validates the bounds
//! against the chain, builds both solver collaborators and only then hands
//! out a facade; there is no half-initialized state to observe.

use std::fmt;
use std::path::Path;

use nalgebra::{DVector, Isometry3};

use limb_urdf::RobotModel;

use crate::chain::KinematicChain;
use crate::classify::{classify_chain, JointType};
use crate::config::{LimitStore, SolveSettings};
use crate::constraints::ConstraintVectors;
use crate::error::{ConfigError, IkError, InvariantViolation};
use crate::solver::{install_capabilities, IkSolution, PositionSolver, SolverFactory, Twist};

/// A fully initialized IK solver over one kinematic chain.
pub struct IkFacade<F: SolverFactory> {
    chain: KinematicChain,
    bounds: ConstraintVectors,
    joint_types: Vec<JointType>,
    settings: SolveSettings,
    solver: F::Position,
}

impl<F: SolverFactory> IkFacade<F> {
    /// Load a URDF file and build the chain from `base_link` to `tip_link`.
    pub fn from_urdf_file(
        path: impl AsRef<Path>,
        base_link: &str,
        tip_link: &str,
        store: &dyn LimitStore,
        settings: SolveSettings,
        factory: &F,
    ) -> Result<Self, IkError> {
        let model = limb_urdf::parse_file(path).map_err(ConfigError::from)?;
        Self::from_model(&model, base_link, tip_link, store, settings, factory)
    }

    /// Parse URDF XML and build the chain from `base_link` to `tip_link`.
    pub fn from_urdf_str(
        xml: &str,
        base_link: &str,
        tip_link: &str,
        store: &dyn LimitStore,
        settings: SolveSettings,
        factory: &F,
    ) -> Result<Self, IkError> {
        let model = limb_urdf::parse_string(xml).map_err(ConfigError::from)?;
        Self::from_model(&model, base_link, tip_link, store, settings, factory)
    }

    /// Build from a parsed model. Bounds are resolved from the model's
    /// limits, its safety controllers and the overrides in `store`.
    pub fn from_model(
        model: &RobotModel,
        base_link: &str,
        tip_link: &str,
        store: &dyn LimitStore,
        settings: SolveSettings,
        factory: &F,
    ) -> Result<Self, IkError> {
        let chain = KinematicChain::from_model(model, base_link, tip_link)?;
        let bounds = ConstraintVectors::resolve(&chain, store);
        Self::initialize(chain, bounds, settings, factory)
    }

    /// Build from an explicit chain and bound vectors.
    ///
    /// Velocity and acceleration are taken as magnitudes. Fails if any
    /// vector length differs from the chain's actuated joint count.
    pub fn with_bounds(
        chain: KinematicChain,
        bounds: ConstraintVectors,
        settings: SolveSettings,
        factory: &F,
    ) -> Result<Self, IkError> {
        Self::initialize(chain, bounds.normalized(), settings, factory)
    }

    fn initialize(
        chain: KinematicChain,
        bounds: ConstraintVectors,
        settings: SolveSettings,
        factory: &F,
    ) -> Result<Self, IkError> {
        settings.validate()?;
        let joint_types = validate(&chain, &bounds)?;
        let dof = chain.dof();

        let mut velocity = factory
            .velocity_solver(dof, settings.loop_period)
            .map_err(IkError::Collaborator)?;
        install_capabilities(&mut velocity, &bounds);
        let solver = factory
            .position_solver(&chain, velocity, &settings)
            .map_err(IkError::Collaborator)?;

        tracing::debug!(dof, ?joint_types, solve_type = ?settings.solve_type, "IK solver ready");
        Ok(Self {
            chain,
            bounds,
            joint_types,
            settings,
            solver,
        })
    }

    /// Solve one Cartesian-to-joint request.
    ///
    /// The request goes to the position-level solver as is, and its result
    /// code and joint configuration come back unchanged.
    pub fn solve(
        &mut self,
        q_init: &DVector<f64>,
        target: &Isometry3<f64>,
        tolerance: &Twist,
    ) -> IkSolution {
        self.solver.cart_to_jnt(q_init, target, tolerance)
    }

    pub fn chain(&self) -> &KinematicChain {
        &self.chain
    }

    /// Resolved bounds, one slot per actuated joint.
    pub fn bounds(&self) -> &ConstraintVectors {
        &self.bounds
    }

    pub fn joint_types(&self) -> &[JointType] {
        &self.joint_types
    }

    pub fn settings(&self) -> &SolveSettings {
        &self.settings
    }

    /// Number of actuated joints.
    pub fn dof(&self) -> usize {
        self.joint_types.len()
    }

    /// Actuated joint names in slot order.
    pub fn joint_names(&self) -> Vec<&str> {
        self.chain.joint_names()
    }

    /// The position-level solver.
    pub fn position_solver(&self) -> &F::Position {
        &self.solver
    }
}

impl<F: SolverFactory> fmt::Debug for IkFacade<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IkFacade")
            .field("chain", &self.chain)
            .field("bounds", &self.bounds)
            .field("joint_types", &self.joint_types)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Check the bound vectors against the chain and classify its joints.
fn validate(
    chain: &KinematicChain,
    bounds: &ConstraintVectors,
) -> Result<Vec<JointType>, InvariantViolation> {
    let expected = chain.dof();
    let check = |got: usize, err: fn(usize, usize) -> InvariantViolation| {
        if got == expected {
            Ok(())
        } else {
            Err(err(expected, got))
        }
    };
    check(bounds.lower.len(), |expected, got| {
        InvariantViolation::LowerBounds { expected, got }
    })?;
    check(bounds.upper.len(), |expected, got| {
        InvariantViolation::UpperBounds { expected, got }
    })?;
    check(bounds.velocity.len(), |expected, got| {
        InvariantViolation::Velocity { expected, got }
    })?;
    check(bounds.acceleration.len(), |expected, got| {
        InvariantViolation::Acceleration { expected, got }
    })?;

    // Cannot fail while the lengths above match; a classifier that skips an
    // actuated joint must still leave the facade unbuilt.
    let joint_types = classify_chain(chain, bounds.lower.as_slice(), bounds.upper.as_slice());
    check(joint_types.len(), |expected, got| {
        InvariantViolation::JointTypes { expected, got }
    })?;

    // NaN bounds fail this check too.
    if let Some(index) = (0..expected).find(|&i| !(bounds.lower[i] <= bounds.upper[i])) {
        return Err(InvariantViolation::InvertedBounds { index });
    }
    if let Some(index) = (0..expected)
        .find(|&i| !(bounds.velocity[i] >= 0.0) || !(bounds.acceleration[i] >= 0.0))
    {
        return Err(InvariantViolation::NegativeRate { index });
    }
    Ok(joint_types)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
