//! A facade handle that may have failed to initialize.
//!
//! [`GuardedIk`] stores the outcome of building an [`IkFacade`] once. When
//! construction failed it stays unusable for good: every
//! [`solve`](GuardedIk::solve) returns [`NOT_READY`] without touching any
//! solver, and the caller has to build a new handle.

use std::fmt;
use std::path::Path;

use nalgebra::{DVector, Isometry3};

use limb_urdf::RobotModel;

use crate::chain::KinematicChain;
use crate::config::{LimitStore, SolveSettings};
use crate::constraints::ConstraintVectors;
use crate::error::IkError;
use crate::facade::IkFacade;
use crate::solver::{IkSolution, SolverFactory, Twist, NOT_READY};

/// Result code and joint configuration of one guarded solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub code: i32,
    /// `None` when the handle was not ready.
    pub joints: Option<DVector<f64>>,
}

impl SolveOutcome {
    pub const fn not_ready() -> Self {
        Self {
            code: NOT_READY,
            joints: None,
        }
    }

    pub const fn is_success(&self) -> bool {
        self.code >= 0
    }
}

impl From<IkSolution> for SolveOutcome {
    fn from(solution: IkSolution) -> Self {
        Self {
            code: solution.code,
            joints: Some(solution.joints),
        }
    }
}

/// An [`IkFacade`] or the reason it could not be built.
pub struct GuardedIk<F: SolverFactory> {
    inner: Result<IkFacade<F>, IkError>,
}

impl<F: SolverFactory> fmt::Debug for GuardedIk<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedIk").field("inner", &self.inner).finish()
    }
}

impl<F: SolverFactory> GuardedIk<F> {
    /// Wrap the outcome of a facade construction.
    pub fn new(result: Result<IkFacade<F>, IkError>) -> Self {
        if let Err(err) = &result {
            tracing::error!(%err, "IK solver initialization failed");
        }
        Self { inner: result }
    }

    /// A handle that was never initialized.
    pub const fn uninitialized() -> Self {
        Self {
            inner: Err(IkError::NotReady),
        }
    }

    /// See [`IkFacade::from_urdf_file`].
    pub fn from_urdf_file(
        path: impl AsRef<Path>,
        base_link: &str,
        tip_link: &str,
        store: &dyn LimitStore,
        settings: SolveSettings,
        factory: &F,
    ) -> Self {
        Self::new(IkFacade::from_urdf_file(
            path, base_link, tip_link, store, settings, factory,
        ))
    }

    /// See [`IkFacade::from_urdf_str`].
    pub fn from_urdf_str(
        xml: &str,
        base_link: &str,
        tip_link: &str,
        store: &dyn LimitStore,
        settings: SolveSettings,
        factory: &F,
    ) -> Self {
        Self::new(IkFacade::from_urdf_str(
            xml, base_link, tip_link, store, settings, factory,
        ))
    }

    /// See [`IkFacade::from_model`].
    pub fn from_model(
        model: &RobotModel,
        base_link: &str,
        tip_link: &str,
        store: &dyn LimitStore,
        settings: SolveSettings,
        factory: &F,
    ) -> Self {
        Self::new(IkFacade::from_model(
            model, base_link, tip_link, store, settings, factory,
        ))
    }

    /// See [`IkFacade::with_bounds`].
    pub fn with_bounds(
        chain: KinematicChain,
        bounds: ConstraintVectors,
        settings: SolveSettings,
        factory: &F,
    ) -> Self {
        Self::new(IkFacade::with_bounds(chain, bounds, settings, factory))
    }

    pub const fn is_ready(&self) -> bool {
        self.inner.is_ok()
    }

    /// Why initialization failed, if it did.
    pub fn error(&self) -> Option<&IkError> {
        self.inner.as_ref().err()
    }

    pub fn facade(&self) -> Option<&IkFacade<F>> {
        self.inner.as_ref().ok()
    }

    pub fn into_facade(self) -> Result<IkFacade<F>, IkError> {
        self.inner
    }

    /// Solve one request, or report [`NOT_READY`] with no joints.
    pub fn solve(
        &mut self,
        q_init: &DVector<f64>,
        target: &Isometry3<f64>,
        tolerance: &Twist,
    ) -> SolveOutcome {
        match self.try_solve(q_init, target, tolerance) {
            Ok(solution) => solution.into(),
            Err(_) => SolveOutcome::not_ready(),
        }
    }

    /// Like [`solve`](Self::solve), with readiness as an error.
    pub fn try_solve(
        &mut self,
        q_init: &DVector<f64>,
        target: &Isometry3<f64>,
        tolerance: &Twist,
    ) -> Result<IkSolution, IkError> {
        match &mut self.inner {
            Ok(facade) => Ok(facade.solve(q_init, target, tolerance)),
            Err(_) => {
                tracing::error!("IK solver was not properly initialized with a valid chain or limits");
                Err(IkError::NotReady)
            }
        }
    }
}

impl<F: SolverFactory> Default for GuardedIk<F> {
    fn default() -> Self {
        Self::uninitialized()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
