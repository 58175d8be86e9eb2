//! Joint bound resolution.
//!
//! A joint's final bounds are its model-declared base bounds folded,
//! left to right, through an ordered list of overrides (safety first, then
//! configuration). Every step can only shrink the admissible range:
//!
//! ```text
//! base ──► safety ──► config ──► (continuous? sentinel bounds) ──► resolved
//! ```
//!
//! Velocity is the smallest magnitude seen; acceleration is taken from the
//! last override that sets one and is `0` otherwise.

use crate::config::JointLimitOverrides;

/// Lower bound used for joints with no position limit: the most negative
/// finite `f32`.
pub const CONTINUOUS_LOWER: f64 = f32::MIN as f64;

/// Upper bound used for joints with no position limit: the most positive
/// finite `f32`.
pub const CONTINUOUS_UPPER: f64 = f32::MAX as f64;

// ---------------------------------------------------------------------------
// JointBounds
// ---------------------------------------------------------------------------

/// Position, velocity and acceleration limits of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointBounds {
    /// Lower position limit (rad or m).
    pub lower: f64,
    /// Upper position limit (rad or m).
    pub upper: f64,
    /// Maximum velocity magnitude (rad/s or m/s).
    pub velocity: f64,
    /// Maximum acceleration magnitude (rad/s^2 or m/s^2).
    pub acceleration: f64,
}

impl JointBounds {
    pub const fn new(lower: f64, upper: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            lower,
            upper,
            velocity,
            acceleration,
        }
    }

    /// Bounds of a joint without position limits.
    pub const fn continuous(velocity: f64, acceleration: f64) -> Self {
        Self::new(CONTINUOUS_LOWER, CONTINUOUS_UPPER, velocity, acceleration)
    }

    /// Whether the position range reaches both sentinels.
    pub fn is_unbounded(&self) -> bool {
        self.lower <= CONTINUOUS_LOWER && self.upper >= CONTINUOUS_UPPER
    }
}

// ---------------------------------------------------------------------------
// LimitOverride
// ---------------------------------------------------------------------------

/// Where an override came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitSource {
    /// Soft limits declared by the model's safety controller.
    Safety,
    /// Values from the external configuration store.
    Config,
}

/// One optional tightening of a joint's base bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitOverride {
    pub source: LimitSource,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
}

impl LimitOverride {
    /// Safety-controller soft position limits.
    pub const fn safety(lower: f64, upper: f64) -> Self {
        Self {
            source: LimitSource::Safety,
            lower: Some(lower),
            upper: Some(upper),
            velocity: None,
            acceleration: None,
        }
    }

    /// Overrides read from the configuration store.
    pub const fn config(values: &JointLimitOverrides) -> Self {
        Self {
            source: LimitSource::Config,
            lower: values.min_position,
            upper: values.max_position,
            velocity: values.max_velocity,
            acceleration: values.max_acceleration,
        }
    }

    /// The override list in precedence order: safety, then config.
    pub fn ordered(
        safety: Option<(f64, f64)>,
        config: Option<&JointLimitOverrides>,
    ) -> Vec<Self> {
        let safety = safety.map(|(lower, upper)| Self::safety(lower, upper));
        let config = config.map(Self::config);
        [safety, config].into_iter().flatten().collect()
    }

    fn apply(&self, bounds: JointBounds) -> JointBounds {
        JointBounds {
            lower: self.lower.map_or(bounds.lower, |l| bounds.lower.max(l)),
            upper: self.upper.map_or(bounds.upper, |u| bounds.upper.min(u)),
            velocity: self.velocity.map_or(bounds.velocity, |v| bounds.velocity.min(v.abs())),
            acceleration: self.acceleration.map_or(bounds.acceleration, f64::abs),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a joint's final bounds from its base bounds and overrides.
///
/// The base acceleration is not consulted: without an override carrying
/// one, the resolved acceleration is `0`.
pub fn resolve(base: &JointBounds, overrides: &[LimitOverride]) -> JointBounds {
    let start = JointBounds {
        velocity: base.velocity.abs(),
        acceleration: 0.0,
        ..*base
    };
    let mut resolved = overrides.iter().fold(start, |b, o| o.apply(b));

    if base.is_unbounded() {
        resolved.lower = CONTINUOUS_LOWER;
        resolved.upper = CONTINUOUS_UPPER;
    }
    resolved
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
