//! 笛卡尔目标规划
//!
//! 末端目标点是运行时间的纯函数：
//!
//! - 横向分量固定（镜像臂为负）
//! - 高度分量按线性斜坡上升并在上限处饱和
//! - 超过 `orbit_start` 秒后叠加一个椭圆绕行偏移
//!
//! # 示例
//!
//! ```rust
//! use twinlink_control::config::ArmSide;
//! use twinlink_control::planner::TargetPlanner;
//!
//! let planner = TargetPlanner::default();
//! let target = planner.target(5.0, ArmSide::Left);
//! assert!((target.x + 0.35).abs() < 1e-12);
//! assert!((target.y - 0.95).abs() < 1e-12);
//! ```

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::config::ArmSide;
use crate::types::ConfigError;

/// 目标规划参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 横向偏移量（m），镜像臂取负
    pub lateral_offset: f64,
    /// 斜坡起始高度（m）
    pub ramp_start: f64,
    /// 斜坡速率（m/s）
    pub ramp_rate: f64,
    /// 斜坡上限（m）
    pub ramp_limit: f64,
    /// 绕行开始时间（s），严格大于该时间才叠加
    pub orbit_start: f64,
    /// 绕行半轴 `[x, y]`（m）
    pub orbit_amplitude: [f64; 2],
    /// 绕行中心的高度偏移（m）
    pub orbit_center_offset: f64,
    /// 绕行角频率（rad/s）
    pub orbit_rate: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lateral_offset: 0.35,
            ramp_start: 0.7,
            ramp_rate: 0.05,
            ramp_limit: 1.3,
            orbit_start: 10.0,
            orbit_amplitude: [0.3, 0.2],
            orbit_center_offset: -0.2,
            orbit_rate: 0.5,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("planner.lateral_offset", self.lateral_offset),
            ("planner.ramp_start", self.ramp_start),
            ("planner.ramp_rate", self.ramp_rate),
            ("planner.ramp_limit", self.ramp_limit),
            ("planner.orbit_start", self.orbit_start),
            ("planner.orbit_amplitude[0]", self.orbit_amplitude[0]),
            ("planner.orbit_amplitude[1]", self.orbit_amplitude[1]),
            ("planner.orbit_center_offset", self.orbit_center_offset),
            ("planner.orbit_rate", self.orbit_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::invalid(name, "must be finite"));
            }
        }
        Ok(())
    }
}

/// 笛卡尔目标规划器（无状态）
#[derive(Debug, Clone, Default)]
pub struct TargetPlanner {
    config: PlannerConfig,
}

impl TargetPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 计算 `elapsed` 秒时的末端目标点
    pub fn target(&self, elapsed: f64, side: ArmSide) -> Vector2<f64> {
        let c = &self.config;
        let lateral = if side.is_mirrored() {
            -c.lateral_offset
        } else {
            c.lateral_offset
        };
        let height = (c.ramp_start + c.ramp_rate * elapsed).min(c.ramp_limit);

        let mut target = Vector2::new(lateral, height);
        if elapsed > c.orbit_start {
            target += self.orbit_offset(elapsed);
        }
        target
    }

    /// 绕行偏移（不考虑起始时间）
    pub fn orbit_offset(&self, elapsed: f64) -> Vector2<f64> {
        let c = &self.config;
        let phase = c.orbit_rate * elapsed;
        Vector2::new(
            c.orbit_amplitude[0] * phase.sin(),
            c.orbit_center_offset + c.orbit_amplitude[1] * phase.cos(),
        )
    }
}
