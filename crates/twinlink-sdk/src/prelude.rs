//! Prelude - 常用类型一次导入
//!
//! ```rust
//! use twinlink_sdk::prelude::*;
//! ```

pub use twinlink_control::config::{ArmConfig, ArmSide, JointNames};
pub use twinlink_control::control::{
    ArmBindings, ControlContext, ControlCycle, Controller, Lifecycle, LoopConfig, LoopStats,
    TickOutcome, TickReport, run_controller, run_controller_spin, run_controller_spin_until,
};
pub use twinlink_control::force::{Compensation, CompensatorConfig, ForceCompensator};
pub use twinlink_control::io::{ForceTorque, JointIo};
pub use twinlink_control::kinematics::{KinematicModel, KinematicState};
pub use twinlink_control::mapper::{CartesianToJointMapper, MapperConfig, Mapping, ResidualGate};
pub use twinlink_control::planner::{PlannerConfig, TargetPlanner};
pub use twinlink_control::regulator::{
    CascadeRegulator, JointFeedback, LoopGains, LoopToggles, RegulatorConfig, RegulatorState,
};
pub use twinlink_control::types::{
    ConfigError, ControlError, Joint, JointArray, NewtonMeter, Rad, RadPerSec,
};
pub use twinlink_geometry::{Pose2, Screw2, Vector2, Vector3};
