//! Per-joint constraint vectors handed to the velocity-level solver.

use nalgebra::DVector;

use crate::chain::KinematicChain;
use crate::config::LimitStore;
use crate::limits::{resolve, JointBounds, LimitOverride};

/// Lower, upper, velocity and acceleration bounds, one slot per actuated
/// joint in chain order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintVectors {
    pub lower: DVector<f64>,
    pub upper: DVector<f64>,
    pub velocity: DVector<f64>,
    pub acceleration: DVector<f64>,
}

impl ConstraintVectors {
    pub fn new(
        lower: Vec<f64>,
        upper: Vec<f64>,
        velocity: Vec<f64>,
        acceleration: Vec<f64>,
    ) -> Self {
        Self {
            lower: DVector::from_vec(lower),
            upper: DVector::from_vec(upper),
            velocity: DVector::from_vec(velocity),
            acceleration: DVector::from_vec(acceleration),
        }
    }

    /// Resolve the bounds of every actuated joint of `chain`.
    ///
    /// Each joint's model limits are tightened by its safety limits and
    /// then by whatever `store` holds for the joint's name.
    pub fn resolve(chain: &KinematicChain, store: &dyn LimitStore) -> Self {
        let resolved: Vec<JointBounds> = chain
            .actuated_joints()
            .map(|joint| {
                let config = store.overrides(&joint.name);
                let overrides = LimitOverride::ordered(joint.safety, config.as_ref());
                let bounds = resolve(&joint.limits, &overrides);

                tracing::info!(
                    joint = %joint.name,
                    lb = bounds.lower,
                    ub = bounds.upper,
                    v = bounds.velocity,
                    a = bounds.acceleration,
                    "using joint limits"
                );
                if bounds.acceleration == 0.0 {
                    tracing::debug!(joint = %joint.name, "no acceleration limit configured");
                }
                bounds
            })
            .collect();

        Self::from_bounds(&resolved)
    }

    /// Stack per-joint bounds into vectors.
    pub fn from_bounds(bounds: &[JointBounds]) -> Self {
        Self {
            lower: DVector::from_iterator(bounds.len(), bounds.iter().map(|b| b.lower)),
            upper: DVector::from_iterator(bounds.len(), bounds.iter().map(|b| b.upper)),
            velocity: DVector::from_iterator(bounds.len(), bounds.iter().map(|b| b.velocity)),
            acceleration: DVector::from_iterator(
                bounds.len(),
                bounds.iter().map(|b| b.acceleration),
            ),
        }
    }

    /// Copy with velocity and acceleration replaced by their magnitudes.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            velocity: self.velocity.abs(),
            acceleration: self.acceleration.abs(),
        }
    }

    /// Bounds of slot `index`, if all four vectors have it.
    pub fn joint(&self, index: usize) -> Option<JointBounds> {
        Some(JointBounds::new(
            *self.lower.get(index)?,
            *self.upper.get(index)?,
            *self.velocity.get(index)?,
            *self.acceleration.get(index)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
