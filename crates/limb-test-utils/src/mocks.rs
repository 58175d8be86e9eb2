//! Recording mock solver collaborators.
//!
//! [`RecordingFactory`] builds [`MockVelocitySolver`] and
//! [`MockPositionSolver`] instances that all write into one shared
//! [`CallLog`], so a test can check what the facade built, what it installed
//! and what it forwarded.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{DVector, Isometry3};

use limb_ik::{
    ConstraintVectors, IkSolution, KinematicChain, PositionSolver, SolveSettings, SolverFactory,
    Twist, VelocitySolver,
};

// ---------------------------------------------------------------------------
// CallLog
// ---------------------------------------------------------------------------

/// One forwarded solve request.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    pub q_init: DVector<f64>,
    pub target: Isometry3<f64>,
    pub tolerance: Twist,
}

/// Everything the mocks were asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallLog {
    /// `(dof, loop_period)` of every velocity solver built.
    pub velocity_builds: Vec<(usize, f64)>,
    /// Capabilities installed on any velocity solver, in call order.
    pub capabilities: Vec<ConstraintVectors>,
    /// Actuated joint names and settings of every position solver built.
    pub position_builds: Vec<(Vec<String>, SolveSettings)>,
    pub solves: Vec<SolveRequest>,
}

impl CallLog {
    pub fn total_calls(&self) -> usize {
        self.velocity_builds.len()
            + self.capabilities.len()
            + self.position_builds.len()
            + self.solves.len()
    }
}

// ---------------------------------------------------------------------------
// RecordingFactory
// ---------------------------------------------------------------------------

/// A [`SolverFactory`] whose products record into a shared [`CallLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    log: Rc<RefCell<CallLog>>,
    code: i32,
    fail_velocity: bool,
    fail_position: bool,
}

impl RecordingFactory {
    /// Solvers that report `code` from every solve.
    pub fn returning(code: i32) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    /// Refuse to build the velocity solver.
    #[must_use]
    pub fn failing_velocity(mut self) -> Self {
        self.fail_velocity = true;
        self
    }

    /// Refuse to build the position solver.
    #[must_use]
    pub fn failing_position(mut self) -> Self {
        self.fail_position = true;
        self
    }

    /// Snapshot of the calls so far.
    pub fn log(&self) -> CallLog {
        self.log.borrow().clone()
    }
}

impl SolverFactory for RecordingFactory {
    type Velocity = MockVelocitySolver;
    type Position = MockPositionSolver;

    fn velocity_solver(&self, dof: usize, loop_period: f64) -> Result<MockVelocitySolver, String> {
        self.log.borrow_mut().velocity_builds.push((dof, loop_period));
        if self.fail_velocity {
            return Err("velocity solver unavailable".into());
        }
        Ok(MockVelocitySolver {
            log: Rc::clone(&self.log),
            capabilities: None,
        })
    }

    fn position_solver(
        &self,
        chain: &KinematicChain,
        velocity: MockVelocitySolver,
        settings: &SolveSettings,
    ) -> Result<MockPositionSolver, String> {
        let names = chain.joint_names().into_iter().map(String::from).collect();
        self.log
            .borrow_mut()
            .position_builds
            .push((names, *settings));
        if self.fail_position {
            return Err("position solver unavailable".into());
        }
        Ok(MockPositionSolver {
            log: Rc::clone(&self.log),
            velocity,
            code: self.code,
        })
    }
}

// ---------------------------------------------------------------------------
// MockVelocitySolver
// ---------------------------------------------------------------------------

/// Keeps the last installed capabilities.
#[derive(Debug)]
pub struct MockVelocitySolver {
    log: Rc<RefCell<CallLog>>,
    capabilities: Option<ConstraintVectors>,
}

impl MockVelocitySolver {
    pub const fn capabilities(&self) -> Option<&ConstraintVectors> {
        self.capabilities.as_ref()
    }
}

impl VelocitySolver for MockVelocitySolver {
    fn set_joint_capabilities(
        &mut self,
        lower: &DVector<f64>,
        upper: &DVector<f64>,
        velocity: &DVector<f64>,
        acceleration: &DVector<f64>,
    ) {
        let caps = ConstraintVectors {
            lower: lower.clone(),
            upper: upper.clone(),
            velocity: velocity.clone(),
            acceleration: acceleration.clone(),
        };
        self.log.borrow_mut().capabilities.push(caps.clone());
        self.capabilities = Some(caps);
    }
}

// ---------------------------------------------------------------------------
// MockPositionSolver
// ---------------------------------------------------------------------------

/// Answers every request with its configured code and `q_init` clamped to
/// the position bounds installed on its velocity solver.
#[derive(Debug)]
pub struct MockPositionSolver {
    log: Rc<RefCell<CallLog>>,
    velocity: MockVelocitySolver,
    code: i32,
}

impl MockPositionSolver {
    /// The velocity solver this one owns.
    pub const fn velocity(&self) -> &MockVelocitySolver {
        &self.velocity
    }
}

impl PositionSolver for MockPositionSolver {
    fn cart_to_jnt(
        &mut self,
        q_init: &DVector<f64>,
        target: &Isometry3<f64>,
        tolerance: &Twist,
    ) -> IkSolution {
        self.log.borrow_mut().solves.push(SolveRequest {
            q_init: q_init.clone(),
            target: *target,
            tolerance: *tolerance,
        });

        let joints = match self.velocity.capabilities() {
            Some(caps) if caps.lower.len() == q_init.len() => {
                DVector::from_fn(q_init.len(), |i, _| {
                    q_init[i].max(caps.lower[i]).min(caps.upper[i])
                })
            }
            _ => q_init.clone(),
        };
        IkSolution::new(self.code, joints)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
