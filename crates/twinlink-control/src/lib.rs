//! # twinlink-control
//!
//! 两关节平面机械臂的笛卡尔跟踪控制律。
//!
//! # 模块
//!
//! - **kinematics**: 正运动学与关节灵敏度（雅可比列）
//! - **planner**: 随时间变化的末端目标点
//! - **force**: 末端接触力补偿
//! - **mapper**: 笛卡尔修正量到关节速度指令（SVD 伪逆）
//! - **regulator**: 每关节三级串级调节器
//! - **control**: 控制周期编排与定频循环
//! - **io**: 仿真/硬件读写抽象（[`io::JointIo`]）
//! - **config**: TOML 配置
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use twinlink_control::config::ArmConfig;
//! use twinlink_control::control::{ControlCycle, TickOutcome};
//!
//! let mut cycle = ControlCycle::bind(&mut plant, &ArmConfig::default())?;
//! loop {
//!     plant.step(dt);
//!     if let TickOutcome::Applied(report) = cycle.tick(&mut plant, plant.time())? {
//!         println!("tracking error: {:.4}", report.tracking_error());
//!     }
//! }
//! ```

pub mod config;
pub mod control;
pub mod force;
pub mod io;
pub mod kinematics;
pub mod mapper;
pub mod planner;
pub mod regulator;
pub mod types;

pub use config::{ArmConfig, ArmSide};
pub use control::{ControlCycle, Controller, TickOutcome, TickReport};
pub use io::{ForceTorque, JointIo};
pub use types::{ConfigError, ControlError, Joint, JointArray, NewtonMeter, Rad, RadPerSec};
