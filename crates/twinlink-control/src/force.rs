//! 接触力补偿
//!
//! 末端传感关节报告的是作用在传感器上的力。取反得到末端对环境的反作用力，
//! 再按末端朝向旋转到全局坐标系，按比例折算为位置误差偏置与速度目标偏置。

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use twinlink_geometry::Pose2;

use crate::io::ForceTorque;
use crate::types::ConfigError;

/// 力补偿增益
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensatorConfig {
    /// 全局力 x 分量折算到位置误差的比例
    pub position_gain: f64,
    /// 全局力折算到速度目标的比例
    pub velocity_gain: f64,
}

impl Default for CompensatorConfig {
    fn default() -> Self {
        Self {
            position_gain: 0.001,
            velocity_gain: 0.001,
        }
    }
}

impl CompensatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.position_gain.is_finite() {
            return Err(ConfigError::invalid("force.position_gain", "must be finite"));
        }
        if !self.velocity_gain.is_finite() {
            return Err(ConfigError::invalid("force.velocity_gain", "must be finite"));
        }
        Ok(())
    }
}

/// 力补偿结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensation {
    /// 全局坐标系下的反作用力（平面投影）
    pub global_force: Vector2<f64>,
    /// 叠加到笛卡尔位置误差上的偏置（仅 x 分量非零）
    pub position_bias: Vector2<f64>,
    /// 叠加到笛卡尔速度目标上的偏置
    pub velocity_bias: Vector2<f64>,
}

impl Compensation {
    pub fn none() -> Self {
        Self {
            global_force: Vector2::zeros(),
            position_bias: Vector2::zeros(),
            velocity_bias: Vector2::zeros(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForceCompensator {
    config: CompensatorConfig,
}

impl ForceCompensator {
    pub fn new(config: CompensatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompensatorConfig {
        &self.config
    }

    /// 计算补偿量
    ///
    /// 传感器报告系的 x、z 轴对应机械臂平面；局部反作用力为 `(-Fx, -Fz)`。
    pub fn compensate(&self, reading: &ForceTorque, output: &Pose2) -> Compensation {
        let local = Vector2::new(-reading.force.x, -reading.force.z);
        let global_force = output.rotate_vector(local);

        Compensation {
            global_force,
            position_bias: Vector2::new(self.config.position_gain * global_force.x, 0.0),
            velocity_bias: self.config.velocity_gain * global_force,
        }
    }
}
