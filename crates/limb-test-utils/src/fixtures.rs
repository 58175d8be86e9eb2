//! URDF and configuration fixtures.

/// Two revolute joints and a fixed end-effector mount.
pub const TWO_LINK_ARM: &str = r#"
    <robot name="two_link_arm">
        <link name="base"/>
        <link name="upper_arm"/>
        <link name="forearm"/>
        <link name="end_effector"/>
        <joint name="shoulder" type="revolute">
            <parent link="base"/><child link="upper_arm"/>
            <origin xyz="0 0 0.05" rpy="0 0 0"/>
            <axis xyz="0 0 1"/>
            <limit lower="-2.617" upper="2.617" effort="50" velocity="3"/>
        </joint>
        <joint name="elbow" type="revolute">
            <parent link="upper_arm"/><child link="forearm"/>
            <origin xyz="0 0 0.3" rpy="0 0 0"/>
            <axis xyz="0 0 1"/>
            <limit lower="-2.094" upper="2.094" effort="30" velocity="5"/>
        </joint>
        <joint name="ee_fixed" type="fixed">
            <parent link="forearm"/><child link="end_effector"/>
            <origin xyz="0 0 0.25"/>
        </joint>
    </robot>
"#;

/// An arm on a linear rail.
///
/// `base → tool` runs through `rail` (prismatic), `shoulder` (revolute with
/// a safety controller), `elbow` (revolute, negative declared velocity),
/// `wrist` (continuous) and the fixed `tool_mount`. A fixed camera hangs
/// off `forearm` on a side branch.
pub const RAIL_ARM: &str = r#"
    <robot name="rail_arm">
        <link name="base"/>
        <link name="carriage"/>
        <link name="upper_arm"/>
        <link name="forearm"/>
        <link name="wrist_link"/>
        <link name="tool"/>
        <link name="camera"/>
        <joint name="rail" type="prismatic">
            <parent link="base"/><child link="carriage"/>
            <axis xyz="1 0 0"/>
            <limit lower="0.0" upper="0.5" effort="200" velocity="0.25"/>
        </joint>
        <joint name="shoulder" type="revolute">
            <parent link="carriage"/><child link="upper_arm"/>
            <origin xyz="0 0 0.1"/>
            <axis xyz="0 1 0"/>
            <limit lower="-2.0" upper="2.0" effort="80" velocity="2"/>
            <safety_controller soft_lower_limit="-1.9" soft_upper_limit="1.8" k_position="100" k_velocity="10"/>
        </joint>
        <joint name="elbow" type="revolute">
            <parent link="upper_arm"/><child link="forearm"/>
            <origin xyz="0 0 0.3"/>
            <axis xyz="0 1 0"/>
            <limit lower="-1.5" upper="1.5" effort="40" velocity="-3"/>
        </joint>
        <joint name="wrist" type="continuous">
            <parent link="forearm"/><child link="wrist_link"/>
            <origin xyz="0 0 0.25"/>
            <axis xyz="0 0 1"/>
            <limit effort="10" velocity="4"/>
        </joint>
        <joint name="tool_mount" type="fixed">
            <parent link="wrist_link"/><child link="tool"/>
            <origin xyz="0 0 0.05"/>
        </joint>
        <joint name="camera_mount" type="fixed">
            <parent link="forearm"/><child link="camera"/>
            <origin xyz="0.05 0 0.1"/>
        </joint>
    </robot>
"#;

/// Settings and overrides for [`RAIL_ARM`].
pub const RAIL_ARM_CONFIG: &str = r#"
    [settings]
    max_time = 0.01
    eps = 1e-6
    solve_type = "sns_optimal"
    loop_period = 0.005

    [joint_limits.shoulder]
    max_position = 1.2
    max_acceleration = 5.0

    [joint_limits.elbow]
    min_position = -1.0
    max_velocity = -1.5

    [joint_limits.wrist]
    min_position = -0.5
    max_position = 0.5
    max_acceleration = -8.0
"#;
