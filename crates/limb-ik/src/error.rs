use thiserror::Error;

use limb_urdf::UrdfError;

/// Top-level error type for limb-ik.
#[derive(Debug, Error)]
pub enum IkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("Solver collaborator could not be constructed: {0}")]
    Collaborator(String),

    #[error("IK solver was not properly initialized with a valid chain or limits")]
    NotReady,
}

/// The model, the chain or the override store could not be obtained.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Robot model error: {0}")]
    Model(#[from] UrdfError),

    #[error("Couldn't find chain {base} to {tip}")]
    ChainNotFound { base: String, tip: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Resolved constraint vectors are inconsistent with the chain.
///
/// Copy + static messages, like every per-joint check in the initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Number of joint lower bounds ({got}) does not equal number of joints ({expected})")]
    LowerBounds { expected: usize, got: usize },

    #[error("Number of joint upper bounds ({got}) does not equal number of joints ({expected})")]
    UpperBounds { expected: usize, got: usize },

    #[error("Number of max joint velocity bounds ({got}) does not equal number of joints ({expected})")]
    Velocity { expected: usize, got: usize },

    #[error("Number of max joint acceleration bounds ({got}) does not equal number of joints ({expected})")]
    Acceleration { expected: usize, got: usize },

    #[error("Could not determine joint types for all joints: classified {got} of {expected}")]
    JointTypes { expected: usize, got: usize },

    #[error("Lower bound exceeds upper bound at joint {index}")]
    InvertedBounds { index: usize },

    #[error("Velocity or acceleration limit at joint {index} is not a non-negative number")]
    NegativeRate { index: usize },
}
