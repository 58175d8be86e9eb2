//! Inverse kinematics front end for limb robots.
//!
//! Derives per-joint constraints (position bounds, velocity and
//! acceleration limits) from a robot model, its safety controllers and a
//! configuration store, classifies every actuated joint, and wires the
//! velocity-level and position-level solver collaborators behind a single
//! `solve` call.
//!
//! # Architecture
//!
//! ```text
//! RobotModel ──► KinematicChain ──► ConstraintVectors ──► IkFacade ──► solve
//!                     ▲                   ▲                   │
//!                     │              LimitStore          SolverFactory
//!                base/tip links     (TOML overrides)   (velocity + position)
//! ```
//!
//! [`IkFacade`] is either fully initialized or not built at all.
//! [`GuardedIk`] keeps a failed construction around and answers every solve
//! with [`NOT_READY`].

pub mod chain;
pub mod classify;
pub mod config;
pub mod constraints;
pub mod error;
pub mod facade;
pub mod guarded;
pub mod limits;
pub mod solver;

pub use chain::{ChainJoint, JointAxis, KinematicChain};
pub use classify::JointType;
pub use config::{
    IkConfig, JointLimitOverrides, JointLimitsConfig, LimitStore, NoOverrides, SolveSettings,
    SolveType,
};
pub use constraints::ConstraintVectors;
pub use error::{ConfigError, IkError, InvariantViolation};
pub use facade::IkFacade;
pub use guarded::{GuardedIk, SolveOutcome};
pub use limits::{JointBounds, LimitOverride, LimitSource, CONTINUOUS_LOWER, CONTINUOUS_UPPER};
pub use solver::{
    IkSolution, PositionSolver, SolverFactory, Twist, VelocitySolver, NOT_READY,
};
