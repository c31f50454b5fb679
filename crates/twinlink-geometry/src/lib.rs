//! # twinlink-geometry
//!
//! 平面刚体代数：位姿（`Pose2`）与旋量（`Screw2`）。
//!
//! 本 crate 只包含纯计算，不涉及任何时间、状态或 IO，
//! 供运动学模型与力补偿计算使用。
//!
//! # 约定
//!
//! - 角度单位为弧度，逆时针为正
//! - 位姿组合 `a * b` 表示先应用 `b` 再应用 `a`（即 `b` 描述在 `a` 的局部坐标系中）
//! - 二维叉积 `ω × (x, y) = (-ω·y, ω·x)`
//!
//! # 示例
//!
//! ```rust
//! use twinlink_geometry::{Pose2, Screw2, Vector2};
//!
//! let shoulder = Pose2::from_translation(Vector2::new(0.0, 0.0));
//! let elbow = shoulder * Pose2::from_rotation(-0.3) * Pose2::from_translation(Vector2::new(0.0, 0.8));
//!
//! // 关节处单位角速度在肘部产生的线速度
//! let twist = Screw2::new(-1.0, Vector2::zeros()).carry((shoulder.inverse() * elbow).translation());
//! assert!(twist.linear.norm() > 0.0);
//! ```

mod pose;
mod screw;

pub use pose::Pose2;
pub use screw::{Screw2, cross};

/// 重新导出常用 nalgebra 类型，避免下游 crate 版本不一致
pub use nalgebra::{Rotation2, Vector2, Vector3};
