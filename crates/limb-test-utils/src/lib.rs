//! Shared test fixtures and utilities for limb crates.
//!
//! Provides URDF fixtures, recording mock solver collaborators and a
//! tracing subscriber for test output.

pub mod fixtures;
pub mod log;
pub mod mocks;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use log::init_test_tracing;
pub use mocks::{CallLog, MockPositionSolver, MockVelocitySolver, RecordingFactory};
