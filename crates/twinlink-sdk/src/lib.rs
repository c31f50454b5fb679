//! twinlink SDK - 两关节平面机械臂控制律
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **几何层** (`geometry`): 平面位姿与旋量
//! - **控制层** (`control`): 运动学、目标规划、力补偿、关节映射、串级调节、控制周期
//!
//! # 快速开始
//!
//! ```rust
//! use twinlink_sdk::prelude::*;
//!
//! let planner = TargetPlanner::default();
//! let target = planner.target(5.0, ArmSide::Left);
//! assert!((target.y - 0.95).abs() < 1e-12);
//! ```

pub mod logging;
pub mod prelude;

pub use twinlink_control as control;
pub use twinlink_geometry as geometry;

// --- 用户以此为界 ---
// 以下是通过 Facade Pattern 提供的公共 API

pub use twinlink_control::{
    ArmConfig, ArmSide, ConfigError, ControlCycle, ControlError, Controller, ForceTorque, Joint,
    JointArray, JointIo, NewtonMeter, Rad, RadPerSec, TickOutcome, TickReport,
};
pub use twinlink_geometry::{Pose2, Screw2};

pub use logging::{init_logger, init_logger_with_filter};
