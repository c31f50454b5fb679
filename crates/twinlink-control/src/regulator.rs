//! 三级串级调节器（每个关节一个）
//!
//! # 算法
//!
//! ```text
//! speed2 环:  θ_target += ω2_target · dt
//! 位置环:     e_θ = θ_target - θ
//!             I_θ += e_θ · dt
//!             ω_target = Kp_θ · e_θ + Ki_θ · I_θ - c · τ_last
//! 速度环:     e_ω = ω_target - ω
//!             I_ω += e_ω · dt
//!             τ = Kp_ω · e_ω + Ki_ω · I_ω
//! ```
//!
//! 增益按 `Kp = K·D`、`Ki = K·W` 由三个参数导出。
//! speed2 环与位置环可以单独关闭；速度环始终运行。
//!
//! # 示例
//!
//! ```rust
//! use twinlink_control::regulator::{CascadeRegulator, JointFeedback, RegulatorConfig};
//! use twinlink_control::types::{Rad, RadPerSec};
//!
//! let mut reg = CascadeRegulator::new(RegulatorConfig::default());
//! reg.set_speed2_target(RadPerSec(0.5));
//! let torque = reg.step(JointFeedback::new(Rad(0.0), RadPerSec(0.0)), 0.001);
//! assert!(torque.0 > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{ConfigError, NewtonMeter, Rad, RadPerSec};

/// 关节反馈
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointFeedback {
    pub angle: Rad,
    pub velocity: RadPerSec,
}

impl JointFeedback {
    pub fn new(angle: Rad, velocity: RadPerSec) -> Self {
        Self { angle, velocity }
    }
}

/// 单环增益参数（`Kp = K·D`，`Ki = K·W`）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopGains {
    pub k: f64,
    pub d: f64,
    pub w: f64,
}

impl LoopGains {
    pub const fn new(k: f64, d: f64, w: f64) -> Self {
        Self { k, d, w }
    }

    #[inline]
    pub fn kp(&self) -> f64 {
        self.k * self.d
    }

    #[inline]
    pub fn ki(&self) -> f64 {
        self.k * self.w
    }

    fn is_finite(&self) -> bool {
        self.k.is_finite() && self.d.is_finite() && self.w.is_finite()
    }
}

/// 环路开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopToggles {
    /// speed2 环：将速度前馈积分进位置目标
    pub speed2: bool,
    /// 位置环：由位置误差生成速度目标
    pub position: bool,
}

impl Default for LoopToggles {
    fn default() -> Self {
        Self {
            speed2: true,
            position: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatorConfig {
    /// 位置环积分增益的额外倍率
    pub position_integral_scale: f64,
    /// 上一周期力矩反馈到速度目标的比例
    pub effort_damping: f64,
    /// 启动时的 speed2 目标
    pub initial_speed2_target: f64,
    /// 复位后的 speed2 目标
    pub reset_speed2_target: f64,
    pub speed: LoopGains,
    pub position: LoopGains,
    pub loops: LoopToggles,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            position_integral_scale: 0.0,
            effort_damping: 0.001,
            initial_speed2_target: 0.3,
            reset_speed2_target: 0.05,
            speed: LoopGains::new(4.0, 8.0, 5.0),
            position: LoopGains::new(4.0, 12.0, 0.2),
            loops: LoopToggles::default(),
        }
    }
}

impl RegulatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() {
            return Err(ConfigError::invalid("regulator.speed", "gains must be finite"));
        }
        if !self.position.is_finite() {
            return Err(ConfigError::invalid("regulator.position", "gains must be finite"));
        }
        let scalars = [
            ("regulator.position_integral_scale", self.position_integral_scale),
            ("regulator.effort_damping", self.effort_damping),
            ("regulator.initial_speed2_target", self.initial_speed2_target),
            ("regulator.reset_speed2_target", self.reset_speed2_target),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::invalid(name, "must be finite"));
            }
        }
        Ok(())
    }

    /// 导出实际使用的增益
    pub fn gains(&self) -> RegulatorGains {
        RegulatorGains {
            position_kp: self.position.kp(),
            position_ki: self.position.ki() * self.position_integral_scale,
            speed_kp: self.speed.kp(),
            speed_ki: self.speed.ki(),
        }
    }
}

/// 导出后的增益
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegulatorGains {
    pub position_kp: f64,
    pub position_ki: f64,
    pub speed_kp: f64,
    pub speed_ki: f64,
}

/// 调节器内部状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegulatorState {
    pub position_target: Rad,
    pub speed_target: RadPerSec,
    /// 速度前馈目标（来自笛卡尔映射）
    pub speed2_target: RadPerSec,
    pub position_error: Rad,
    pub speed_error: RadPerSec,
    /// 位置误差积分（rad·s）
    pub position_integral: f64,
    /// 速度误差积分（rad）
    pub speed_integral: f64,
    /// 上一周期输出力矩
    pub torque: NewtonMeter,
}

/// 串级调节器
#[derive(Debug, Clone)]
pub struct CascadeRegulator {
    gains: RegulatorGains,
    loops: LoopToggles,
    effort_damping: f64,
    reset_speed2_target: RadPerSec,
    state: RegulatorState,
}

impl CascadeRegulator {
    pub fn new(config: RegulatorConfig) -> Self {
        Self {
            gains: config.gains(),
            loops: config.loops,
            effort_damping: config.effort_damping,
            reset_speed2_target: RadPerSec(config.reset_speed2_target),
            state: RegulatorState {
                speed2_target: RadPerSec(config.initial_speed2_target),
                ..Default::default()
            },
        }
    }

    pub fn state(&self) -> &RegulatorState {
        &self.state
    }

    pub fn gains(&self) -> &RegulatorGains {
        &self.gains
    }

    pub fn loops(&self) -> LoopToggles {
        self.loops
    }

    pub fn set_loops(&mut self, loops: LoopToggles) {
        self.loops = loops;
    }

    /// 上一周期输出的力矩
    pub fn torque(&self) -> NewtonMeter {
        self.state.torque
    }

    pub fn set_speed2_target(&mut self, target: RadPerSec) {
        self.state.speed2_target = target;
    }

    pub fn set_position_target(&mut self, target: Rad) {
        self.state.position_target = target;
    }

    /// 直接设置速度目标（位置环关闭时使用）
    pub fn set_speed_target(&mut self, target: RadPerSec) {
        self.state.speed_target = target;
    }

    /// 执行一个周期，返回力矩
    ///
    /// `dt` 非正或非有限时不修改任何状态，返回上一周期的力矩。
    pub fn step(&mut self, feedback: JointFeedback, dt: f64) -> NewtonMeter {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("Regulator step skipped: invalid dt ({}s)", dt);
            return self.state.torque;
        }

        let g = self.gains;
        let s = &mut self.state;

        if self.loops.speed2 {
            s.position_target += Rad(s.speed2_target.0 * dt);
        }

        if self.loops.position {
            s.position_error = s.position_target - feedback.angle;
            s.position_integral += s.position_error.0 * dt;
            s.speed_target = RadPerSec(
                g.position_kp * s.position_error.0 + g.position_ki * s.position_integral
                    - self.effort_damping * s.torque.0,
            );
        }

        s.speed_error = s.speed_target - feedback.velocity;
        s.speed_integral += s.speed_error.0 * dt;
        s.torque = NewtonMeter(g.speed_kp * s.speed_error.0 + g.speed_ki * s.speed_integral);

        s.torque
    }

    /// 复位：误差、目标、积分与输出清零，speed2 目标重置为复位值
    pub fn reset(&mut self) {
        self.state = RegulatorState {
            speed2_target: self.reset_speed2_target,
            ..Default::default()
        };
    }
}

impl Default for CascadeRegulator {
    fn default() -> Self {
        Self::new(RegulatorConfig::default())
    }
}
