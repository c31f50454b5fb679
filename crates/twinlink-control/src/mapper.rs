//! 笛卡尔修正量到关节速度指令的映射
//!
//! 每个周期：
//!
//! 1. 累积笛卡尔位置误差积分 `I += e·dt`
//! 2. 构造笛卡尔速度目标 `T = Kp·e + Ki·I + v_bias`
//! 3. 以两个灵敏度向量为列，用 SVD 伪逆求最小范数最小二乘解 `c`
//! 4. 每个分量限幅到 `[-limit, limit]`
//! 5. 用限幅后的 `c` 计算残差 `‖T - Σ ci·vi‖`
//!
//! 奇异构型（两列线性相关或全零）时伪逆仍给出有限的最小范数解，不会失败。

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::types::{ConfigError, Joint, JointArray, RadPerSec};

/// 残差门限策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResidualGate {
    /// 始终输出限幅后的指令
    #[default]
    Disabled,
    /// 残差超过阈值时输出零指令
    ZeroAbove { threshold: f64 },
}

/// 映射参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// 位置误差比例增益
    pub kp: f64,
    /// 位置误差积分增益
    pub ki: f64,
    /// 关节速度指令限幅（rad/s）
    pub velocity_limit: f64,
    /// 相对奇异值阈值：小于 `tol · σmax` 的奇异值视为 0
    pub singular_tolerance: f64,
    pub residual_gate: ResidualGate,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.05,
            velocity_limit: 3.0,
            singular_tolerance: 1e-9,
            residual_gate: ResidualGate::Disabled,
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.kp.is_finite() || !self.ki.is_finite() {
            return Err(ConfigError::invalid("mapper.kp/ki", "gains must be finite"));
        }
        if !(self.velocity_limit.is_finite() && self.velocity_limit > 0.0) {
            return Err(ConfigError::invalid(
                "mapper.velocity_limit",
                format!("must be finite and > 0, got {}", self.velocity_limit),
            ));
        }
        if !(self.singular_tolerance.is_finite() && self.singular_tolerance >= 0.0) {
            return Err(ConfigError::invalid(
                "mapper.singular_tolerance",
                format!("must be finite and >= 0, got {}", self.singular_tolerance),
            ));
        }
        match self.residual_gate {
            ResidualGate::ZeroAbove { threshold } if !(threshold.is_finite() && threshold >= 0.0) => {
                Err(ConfigError::invalid(
                    "mapper.residual_gate.threshold",
                    format!("must be finite and >= 0, got {}", threshold),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// 单次映射的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapping {
    /// 笛卡尔速度目标 `T`
    pub cartesian_target: Vector2<f64>,
    /// 伪逆解（限幅前）
    pub unclamped: JointArray<f64>,
    /// 最终关节速度指令
    pub commands: JointArray<RadPerSec>,
    /// 限幅后的重构残差
    pub residual: f64,
    /// 指令是否被残差门限清零
    pub gated: bool,
}

/// 笛卡尔到关节空间的映射器
///
/// 持有笛卡尔位置误差积分；积分只在 [`reset`](Self::reset) 时清零。
#[derive(Debug, Clone, Default)]
pub struct CartesianToJointMapper {
    config: MapperConfig,
    integral: Vector2<f64>,
}

impl CartesianToJointMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            integral: Vector2::zeros(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn integral(&self) -> Vector2<f64> {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = Vector2::zeros();
    }

    /// 计算关节速度指令
    pub fn map(
        &mut self,
        position_error: Vector2<f64>,
        velocity_bias: Vector2<f64>,
        sensitivities: &JointArray<Vector2<f64>>,
        dt: f64,
    ) -> Mapping {
        self.integral += position_error * dt;
        let target =
            self.config.kp * position_error + self.config.ki * self.integral + velocity_bias;

        let unclamped = self.solve(sensitivities, target);
        let limit = self.config.velocity_limit;
        let clamped = unclamped.map(|c| c.clamp(-limit, limit));

        let reconstructed = sensitivities[Joint::Shoulder] * clamped[Joint::Shoulder]
            + sensitivities[Joint::Elbow] * clamped[Joint::Elbow];
        let residual = (target - reconstructed).norm();

        let gated = match self.config.residual_gate {
            ResidualGate::Disabled => false,
            ResidualGate::ZeroAbove { threshold } => residual > threshold,
        };
        if gated {
            warn!(residual, "Residual above gate threshold, commanding zero joint velocity");
        }

        let commands = if gated {
            JointArray::splat(RadPerSec::ZERO)
        } else {
            clamped.map(RadPerSec)
        };

        trace!(
            target_x = target.x,
            target_y = target.y,
            c0 = clamped[Joint::Shoulder],
            c1 = clamped[Joint::Elbow],
            residual,
            "Mapped Cartesian correction"
        );

        Mapping {
            cartesian_target: target,
            unclamped,
            commands,
            residual,
            gated,
        }
    }

    /// 最小范数最小二乘：`argmin ‖c0·v0 + c1·v1 - target‖`
    pub fn solve(&self, sensitivities: &JointArray<Vector2<f64>>, target: Vector2<f64>) -> JointArray<f64> {
        let zero = JointArray::splat(0.0);
        let a = Matrix2::from_columns(&[sensitivities[Joint::Shoulder], sensitivities[Joint::Elbow]]);

        let Some(svd) = a.try_svd(true, true, f64::EPSILON, 200) else {
            warn!("SVD did not converge, commanding zero joint velocity");
            return zero;
        };

        let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        if sigma_max <= 0.0 {
            return zero;
        }

        match svd.solve(&target, self.config.singular_tolerance * sigma_max) {
            Ok(c) if c.iter().all(|v| v.is_finite()) => JointArray::new([c.x, c.y]),
            Ok(_) => {
                warn!("Pseudo-inverse produced non-finite values, commanding zero joint velocity");
                zero
            }
            Err(e) => {
                warn!(error = e, "Pseudo-inverse solve failed, commanding zero joint velocity");
                zero
            }
        }
    }
}
