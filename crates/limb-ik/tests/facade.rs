//! Integration tests: facade construction and solve delegation.
//!
//! Drives [`IkFacade`] and [`GuardedIk`] end to end against the recording
//! mock collaborators and checks:
//! 1. Resolved bounds and joint types reach the velocity solver unchanged
//! 2. Any inconsistency leaves the handle not ready, with no collaborator calls
//! 3. Solve requests and result codes pass through untouched

use approx::assert_relative_eq;
use nalgebra::{DVector, Isometry3, Translation3, UnitQuaternion, Vector3};

use limb_ik::{
    ChainJoint, ConfigError, ConstraintVectors, GuardedIk, IkConfig, IkError, IkFacade,
    InvariantViolation, JointAxis, JointBounds, JointLimitOverrides, JointLimitsConfig, JointType,
    KinematicChain, NoOverrides, SolveSettings, SolveType, Twist, CONTINUOUS_LOWER,
    CONTINUOUS_UPPER, NOT_READY,
};
use limb_test_utils::fixtures::{RAIL_ARM, RAIL_ARM_CONFIG, TWO_LINK_ARM};
use limb_test_utils::{init_test_tracing, RecordingFactory};

fn revolute_and_continuous() -> KinematicChain {
    KinematicChain::new(vec![
        ChainJoint::new("j1", JointAxis::Rotational)
            .with_limits(JointBounds::new(-1.0, 1.0, 2.0, 0.0)),
        ChainJoint::new("j2", JointAxis::Rotational)
            .with_limits(JointBounds::continuous(3.0, 0.0)),
    ])
}

fn target() -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(0.3, -0.1, 0.4),
        UnitQuaternion::from_euler_angles(0.0, 0.2, 0.1),
    )
}

fn tolerance() -> Twist {
    Twist::new(Vector3::repeat(1e-3), Vector3::repeat(1e-2))
}

// ---------------------------------------------------------------------------
// Entry A: model + overrides
// ---------------------------------------------------------------------------

#[test]
fn continuous_joint_ignores_position_overrides() {
    init_test_tracing();
    let mut store = JointLimitsConfig::default();
    store.insert(
        "j2",
        JointLimitOverrides {
            min_position: Some(-0.5),
            max_position: Some(0.5),
            ..JointLimitOverrides::default()
        },
    );
    let chain = revolute_and_continuous();
    let bounds = ConstraintVectors::resolve(&chain, &store);
    let factory = RecordingFactory::returning(0);

    let facade = IkFacade::with_bounds(chain, bounds, SolveSettings::default(), &factory).unwrap();

    assert_eq!(
        facade.joint_types(),
        &[JointType::Revolute, JointType::Continuous]
    );
    let b = facade.bounds();
    assert_relative_eq!(b.lower[0], -1.0);
    assert_relative_eq!(b.upper[0], 1.0);
    assert_eq!(b.lower[1], CONTINUOUS_LOWER);
    assert_eq!(b.upper[1], CONTINUOUS_UPPER);
}

#[test]
fn urdf_with_config_installs_resolved_capabilities() {
    init_test_tracing();
    let config = IkConfig::from_toml_str(RAIL_ARM_CONFIG).unwrap();
    let factory = RecordingFactory::returning(0);

    let facade = IkFacade::from_urdf_str(
        RAIL_ARM,
        "base",
        "tool",
        &config,
        config.settings,
        &factory,
    )
    .unwrap();

    assert_eq!(facade.dof(), 4);
    assert_eq!(facade.joint_names(), vec!["rail", "shoulder", "elbow", "wrist"]);
    assert_eq!(
        facade.joint_types(),
        &[
            JointType::Prismatic,
            JointType::Revolute,
            JointType::Revolute,
            JointType::Continuous
        ]
    );

    let log = factory.log();
    assert_eq!(log.velocity_builds, vec![(4, 0.005)]);
    assert_eq!(log.capabilities.len(), 1);
    let caps = &log.capabilities[0];
    assert_eq!(caps, facade.bounds());

    // shoulder: safety lower, config upper (exact), config acceleration
    assert_relative_eq!(caps.lower[1], -1.9);
    assert_eq!(caps.upper[1], 1.2);
    assert_relative_eq!(caps.acceleration[1], 5.0);
    // elbow: config lower, configured velocity magnitude is tighter
    assert_relative_eq!(caps.lower[2], -1.0);
    assert_relative_eq!(caps.upper[2], 1.5);
    assert_relative_eq!(caps.velocity[2], 1.5);
    assert_relative_eq!(caps.acceleration[2], 0.0);
    // wrist: unbounded whatever the config says
    assert_eq!(caps.lower[3], CONTINUOUS_LOWER);
    assert_eq!(caps.upper[3], CONTINUOUS_UPPER);
    assert_relative_eq!(caps.velocity[3], 4.0);
    assert_relative_eq!(caps.acceleration[3], 8.0);

    let (names, settings) = &log.position_builds[0];
    assert_eq!(names, &vec!["rail", "shoulder", "elbow", "wrist"]);
    assert_eq!(settings.solve_type, SolveType::SnsOptimal);
    assert_relative_eq!(settings.max_time, 0.01);
    assert_relative_eq!(settings.eps, 1e-6);

    // The position solver owns the velocity solver that got the capabilities.
    assert_eq!(facade.position_solver().velocity().capabilities(), Some(caps));
}

#[test]
fn urdf_file_round_trip() {
    let path = std::env::temp_dir().join(format!("limb_ik_two_link_{}.urdf", std::process::id()));
    std::fs::write(&path, TWO_LINK_ARM).unwrap();
    let factory = RecordingFactory::returning(0);

    let result = IkFacade::from_urdf_file(
        &path,
        "base",
        "end_effector",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    );
    std::fs::remove_file(&path).unwrap();

    let facade = result.unwrap();
    assert_eq!(facade.joint_names(), vec!["shoulder", "elbow"]);
    assert_eq!(facade.chain().len(), 3);
    assert_relative_eq!(facade.bounds().upper[1], 2.094);
    assert_relative_eq!(facade.bounds().velocity[1], 5.0);
}

#[test]
fn missing_urdf_file_is_config_error() {
    let factory = RecordingFactory::returning(0);
    let err = IkFacade::from_urdf_file(
        "/nonexistent/robot.urdf",
        "base",
        "tool",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    )
    .unwrap_err();
    assert!(matches!(err, IkError::Config(ConfigError::Model(_))));
    assert_eq!(factory.log().total_calls(), 0);
}

#[test]
fn unreachable_tip_leaves_handle_not_ready() {
    init_test_tracing();
    let factory = RecordingFactory::returning(0);
    let mut ik = GuardedIk::from_urdf_str(
        RAIL_ARM,
        "forearm",
        "base",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    );

    assert!(!ik.is_ready());
    assert!(matches!(
        ik.error(),
        Some(IkError::Config(ConfigError::ChainNotFound { .. }))
    ));
    let outcome = ik.solve(&DVector::zeros(4), &target(), &tolerance());
    assert_eq!(outcome.code, NOT_READY);
    assert_eq!(factory.log().total_calls(), 0);
}

#[test]
fn invalid_settings_are_rejected_before_building() {
    let factory = RecordingFactory::returning(0);
    let settings = SolveSettings {
        loop_period: 0.0,
        ..SolveSettings::default()
    };
    let err = IkFacade::from_urdf_str(RAIL_ARM, "base", "tool", &NoOverrides, settings, &factory)
        .unwrap_err();
    assert!(matches!(
        err,
        IkError::Config(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(factory.log().total_calls(), 0);
}

// ---------------------------------------------------------------------------
// Entry B: explicit bounds
// ---------------------------------------------------------------------------

#[test]
fn explicit_bounds_are_normalized() {
    let factory = RecordingFactory::returning(0);
    let bounds = ConstraintVectors::new(
        vec![-1.0, CONTINUOUS_LOWER],
        vec![1.0, CONTINUOUS_UPPER],
        vec![-2.0, 3.0],
        vec![4.0, -5.0],
    );
    let facade = IkFacade::with_bounds(
        revolute_and_continuous(),
        bounds,
        SolveSettings::default(),
        &factory,
    )
    .unwrap();

    let caps = &factory.log().capabilities[0];
    assert_eq!(caps.velocity, DVector::from_vec(vec![2.0, 3.0]));
    assert_eq!(caps.acceleration, DVector::from_vec(vec![4.0, 5.0]));
    assert_eq!(caps, facade.bounds());
}

#[test]
fn length_mismatch_never_reaches_a_collaborator() {
    init_test_tracing();
    let factory = RecordingFactory::returning(0);
    let bounds = ConstraintVectors::new(
        vec![-1.0, -1.0],
        vec![1.0, 1.0],
        vec![1.0],
        vec![0.0, 0.0],
    );
    let mut ik = GuardedIk::with_bounds(
        revolute_and_continuous(),
        bounds,
        SolveSettings::default(),
        &factory,
    );

    assert!(!ik.is_ready());
    assert!(matches!(
        ik.error(),
        Some(IkError::Invariant(InvariantViolation::Velocity {
            expected: 2,
            got: 1
        }))
    ));

    for _ in 0..3 {
        let outcome = ik.solve(&DVector::zeros(2), &target(), &tolerance());
        assert_eq!(outcome.code, -1);
        assert!(outcome.joints.is_none());
    }
    assert_eq!(factory.log().total_calls(), 0);
}

#[test]
fn inverted_bounds_leave_handle_not_ready() {
    let factory = RecordingFactory::returning(0);
    let bounds = ConstraintVectors::new(vec![0.5, 0.0], vec![0.2, 1.0], vec![1.0, 1.0], vec![0.0, 0.0]);
    let chain = KinematicChain::new(vec![
        ChainJoint::new("a", JointAxis::Rotational),
        ChainJoint::new("b", JointAxis::Translational),
    ]);
    let ik = GuardedIk::with_bounds(chain, bounds, SolveSettings::default(), &factory);
    assert!(matches!(
        ik.error(),
        Some(IkError::Invariant(InvariantViolation::InvertedBounds { index: 0 }))
    ));
    assert_eq!(factory.log().total_calls(), 0);
}

#[test]
fn non_finite_configured_rates_leave_handle_not_ready() {
    let config = IkConfig::from_toml_str(
        r#"
        [joint_limits.shoulder]
        max_velocity = 1.0
        max_acceleration = nan
        "#,
    )
    .unwrap();
    let factory = RecordingFactory::returning(0);
    let mut ik = GuardedIk::from_urdf_str(
        RAIL_ARM,
        "base",
        "tool",
        &config,
        config.settings,
        &factory,
    );

    assert!(matches!(
        ik.error(),
        Some(IkError::Invariant(InvariantViolation::NegativeRate { index: 1 }))
    ));
    let outcome = ik.solve(&DVector::zeros(4), &target(), &tolerance());
    assert_eq!(outcome.code, NOT_READY);
    assert_eq!(factory.log().total_calls(), 0);
}

#[test]
fn never_initialized_handle_reports_not_ready() {
    let mut ik: GuardedIk<RecordingFactory> = GuardedIk::default();
    assert!(!ik.is_ready());
    assert!(ik.facade().is_none());

    let outcome = ik.solve(&DVector::zeros(2), &target(), &tolerance());
    assert_eq!(outcome.code, NOT_READY);
    assert!(outcome.joints.is_none());
    assert!(matches!(
        ik.try_solve(&DVector::zeros(2), &target(), &tolerance()),
        Err(IkError::NotReady)
    ));
}

// ---------------------------------------------------------------------------
// Collaborator failures
// ---------------------------------------------------------------------------

#[test]
fn velocity_solver_failure_is_reported() {
    let factory = RecordingFactory::returning(0).failing_velocity();
    let err = IkFacade::from_urdf_str(
        TWO_LINK_ARM,
        "base",
        "end_effector",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    )
    .unwrap_err();
    assert!(matches!(err, IkError::Collaborator(_)));

    let log = factory.log();
    assert_eq!(log.velocity_builds.len(), 1);
    assert!(log.capabilities.is_empty());
    assert!(log.position_builds.is_empty());
}

#[test]
fn position_solver_failure_leaves_handle_not_ready() {
    let factory = RecordingFactory::returning(0).failing_position();
    let mut ik = GuardedIk::from_urdf_str(
        TWO_LINK_ARM,
        "base",
        "end_effector",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    );
    assert!(matches!(ik.error(), Some(IkError::Collaborator(_))));

    let before = factory.log().total_calls();
    let outcome = ik.solve(&DVector::zeros(2), &target(), &tolerance());
    assert_eq!(outcome.code, NOT_READY);
    assert_eq!(factory.log().total_calls(), before);
}

// ---------------------------------------------------------------------------
// Solve delegation
// ---------------------------------------------------------------------------

#[test]
fn solve_forwards_request_and_result() {
    let factory = RecordingFactory::returning(2);
    let mut ik = GuardedIk::from_urdf_str(
        TWO_LINK_ARM,
        "base",
        "end_effector",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    );
    assert!(ik.is_ready());

    let q_init = DVector::from_vec(vec![3.0, -0.5]);
    let outcome = ik.solve(&q_init, &target(), &tolerance());
    assert_eq!(outcome.code, 2);
    assert!(outcome.is_success());
    // mock clamps to the installed position bounds
    let joints = outcome.joints.unwrap();
    assert_relative_eq!(joints[0], 2.617);
    assert_relative_eq!(joints[1], -0.5);

    let log = factory.log();
    assert_eq!(log.solves.len(), 1);
    assert_eq!(log.solves[0].q_init, q_init);
    assert_eq!(log.solves[0].target, target());
    assert_eq!(log.solves[0].tolerance, tolerance());
}

#[test]
fn negative_codes_pass_through() {
    let factory = RecordingFactory::returning(-3);
    let mut facade = IkFacade::from_urdf_str(
        TWO_LINK_ARM,
        "base",
        "end_effector",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    )
    .unwrap();

    let solution = facade.solve(&DVector::zeros(2), &target(), &tolerance());
    assert_eq!(solution.code, -3);
    assert!(!solution.is_success());
}

#[test]
fn repeated_solves_agree() {
    let factory = RecordingFactory::returning(0);
    let mut ik = GuardedIk::from_urdf_str(
        RAIL_ARM,
        "base",
        "tool",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    );
    let q_init = DVector::from_vec(vec![0.7, 0.1, -2.0, 10.0]);

    let first = ik.solve(&q_init, &target(), &tolerance());
    let second = ik.solve(&q_init, &target(), &tolerance());
    assert_eq!(first, second);
    assert_eq!(factory.log().solves.len(), 2);

    // Only the solves were added after construction.
    assert_eq!(factory.log().velocity_builds.len(), 1);
    assert_eq!(factory.log().capabilities.len(), 1);
}

#[test]
fn facade_can_be_taken_out_of_the_handle() {
    let factory = RecordingFactory::returning(0);
    let ik = GuardedIk::from_urdf_str(
        TWO_LINK_ARM,
        "base",
        "end_effector",
        &NoOverrides,
        SolveSettings::default(),
        &factory,
    );
    let facade = ik.into_facade().unwrap();
    assert_eq!(facade.dof(), 2);
    assert_eq!(facade.settings(), &SolveSettings::default());
}
