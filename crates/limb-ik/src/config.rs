use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_max_time() -> f64 {
    0.005
}
const fn default_eps() -> f64 {
    1e-5
}
const fn default_loop_period() -> f64 {
    0.01
}

// ---------------------------------------------------------------------------
// SolveType
// ---------------------------------------------------------------------------

/// Which flavour of the saturation-in-null-space solver the position-level
/// collaborator should run. Passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveType {
    #[default]
    Sns,
    SnsOptimalScaleMargin,
    SnsOptimal,
    SnsFast,
    SnsFastOptimal,
}

// ---------------------------------------------------------------------------
// SolveSettings
// ---------------------------------------------------------------------------

/// Settings handed to the solver collaborators at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveSettings {
    /// Time budget for one position-level solve, in seconds (default: 5 ms).
    #[serde(default = "default_max_time")]
    pub max_time: f64,

    /// Convergence epsilon of the position-level solver (default: 1e-5).
    #[serde(default = "default_eps")]
    pub eps: f64,

    /// Solver flavour.
    #[serde(default)]
    pub solve_type: SolveType,

    /// Control period of the velocity-level solver, in seconds
    /// (default: 0.01 = 100 Hz).
    #[serde(default = "default_loop_period")]
    pub loop_period: f64,
}

impl Default for SolveSettings {
    fn default() -> Self {
        Self {
            max_time: default_max_time(),
            eps: default_eps(),
            solve_type: SolveType::default(),
            loop_period: default_loop_period(),
        }
    }
}

impl SolveSettings {
    /// Settings with the given time budget, epsilon and solve type, and the
    /// default loop period.
    pub fn new(max_time: f64, eps: f64, solve_type: SolveType) -> Self {
        Self {
            max_time,
            eps,
            solve_type,
            ..Self::default()
        }
    }

    /// Validate settings. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_time", self.max_time)?;
        positive("eps", self.eps)?;
        positive("loop_period", self.loop_period)
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("{value} (must be finite and > 0)"),
        })
    }
}

// ---------------------------------------------------------------------------
// JointLimitOverrides / LimitStore
// ---------------------------------------------------------------------------

/// Per-joint override values from the configuration store.
///
/// Every field is optional; a missing field does not constrain anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointLimitOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_acceleration: Option<f64>,
}

impl JointLimitOverrides {
    /// True when no field is set.
    pub const fn is_empty(&self) -> bool {
        self.max_position.is_none()
            && self.min_position.is_none()
            && self.max_velocity.is_none()
            && self.max_acceleration.is_none()
    }
}

/// Keyed lookup of per-joint limit overrides.
///
/// Returning `None` is the normal answer for a joint nobody configured.
pub trait LimitStore {
    fn overrides(&self, joint: &str) -> Option<JointLimitOverrides>;
}

/// A store with no overrides at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl LimitStore for NoOverrides {
    fn overrides(&self, _joint: &str) -> Option<JointLimitOverrides> {
        None
    }
}

impl LimitStore for HashMap<String, JointLimitOverrides> {
    fn overrides(&self, joint: &str) -> Option<JointLimitOverrides> {
        self.get(joint).copied()
    }
}

// ---------------------------------------------------------------------------
// JointLimitsConfig
// ---------------------------------------------------------------------------

/// TOML-backed limit store.
///
/// ```toml
/// [joint_limits.shoulder]
/// max_position = 1.2
/// max_velocity = 1.5
/// max_acceleration = 4.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointLimitsConfig {
    #[serde(default)]
    pub joint_limits: HashMap<String, JointLimitOverrides>,
}

impl JointLimitsConfig {
    /// Set the overrides for one joint, replacing any previous entry.
    pub fn insert(&mut self, joint: impl Into<String>, overrides: JointLimitOverrides) {
        self.joint_limits.insert(joint.into(), overrides);
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl LimitStore for JointLimitsConfig {
    fn overrides(&self, joint: &str) -> Option<JointLimitOverrides> {
        self.joint_limits.overrides(joint)
    }
}

// ---------------------------------------------------------------------------
// IkConfig
// ---------------------------------------------------------------------------

/// Solve settings and joint-limit overrides read from one TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IkConfig {
    #[serde(default)]
    pub settings: SolveSettings,

    #[serde(default, flatten)]
    pub limits: JointLimitsConfig,
}

impl IkConfig {
    /// Parse and validate from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.settings.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl LimitStore for IkConfig {
    fn overrides(&self, joint: &str) -> Option<JointLimitOverrides> {
        self.limits.overrides(joint)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
