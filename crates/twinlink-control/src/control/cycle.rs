//! 控制周期编排
//!
//! 每个仿真步调用一次 [`ControlCycle::tick`]：
//!
//! ```text
//! 反馈读取 → 正运动学 → 目标规划 → 力补偿 → 笛卡尔映射 → 串级调节 → 力矩写回
//! ```
//!
//! # 生命周期
//!
//! - `Uninitialized`：下一次 `tick` 执行安装步骤（打开力反馈、记录时间原点），不输出力矩
//! - `Active`：正常控制；`now` 未前进时保持上一周期力矩，不做任何积分
//!
//! `reset` 将机械臂放回初始构型并回到 `Uninitialized`。

use std::time::Duration;

use nalgebra::Vector2;
use tracing::{debug, info, trace, warn};

use crate::config::{ArmConfig, ArmSide};
use crate::control::controller::Controller;
use crate::force::{Compensation, ForceCompensator};
use crate::io::{ForceTorque, JointIo};
use crate::kinematics::{KinematicModel, KinematicState};
use crate::mapper::{CartesianToJointMapper, Mapping};
use crate::planner::TargetPlanner;
use crate::regulator::{CascadeRegulator, JointFeedback};
use crate::types::{ControlError, Joint, JointArray, NewtonMeter, Result};

/// 控制周期所在的生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Active {
        /// 安装步骤发生的时刻（规划时间原点）
        origin: Duration,
        /// 上一次执行控制的时刻
        last: Duration,
    },
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active { .. })
    }
}

/// 名称解析后的句柄
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmBindings<H> {
    pub joints: JointArray<H>,
    pub sensor: H,
    pub base: H,
}

impl<H: Copy> ArmBindings<H> {
    /// 按配置中的名称解析所有关节与连杆
    pub fn resolve<I>(io: &I, config: &ArmConfig) -> Result<Self>
    where
        I: JointIo<Handle = H>,
    {
        let names = &config.joints;
        let joint = |name: &str| io.joint(name).ok_or_else(|| ControlError::unknown_joint(name));

        let shoulder = joint(&names.shoulder)?;
        let elbow = joint(&names.elbow)?;
        let sensor = joint(&names.sensor)?;
        let base = io
            .link(&names.base_link)
            .ok_or_else(|| ControlError::unknown_link(&names.base_link))?;

        Ok(Self {
            joints: JointArray::new([shoulder, elbow]),
            sensor,
            base,
        })
    }
}

/// 单周期上下文，每个周期重新构造
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlContext {
    /// 自安装步骤以来的时间（s）
    pub elapsed: f64,
    /// 自上一周期以来的时间（s）
    pub dt: f64,
    pub side: ArmSide,
    pub kinematics: KinematicState,
}

/// 一次完整控制周期的诊断信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub context: ControlContext,
    pub feedback: JointArray<JointFeedback>,
    pub target: Vector2<f64>,
    pub position_error: Vector2<f64>,
    pub compensation: Compensation,
    pub mapping: Mapping,
    pub torques: JointArray<NewtonMeter>,
}

impl TickReport {
    /// 末端到目标点的距离（不含力补偿偏置）
    pub fn tracking_error(&self) -> f64 {
        (self.target - self.context.kinematics.output.translation()).norm()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// 安装步骤：打开力反馈、记录时间原点，未输出力矩
    Setup,
    /// 时间未前进：重新施加上一周期的力矩
    Held { torques: JointArray<NewtonMeter> },
    /// 正常控制周期
    Applied(TickReport),
}

/// 两关节机械臂的控制周期
pub struct ControlCycle<I: JointIo> {
    bindings: ArmBindings<I::Handle>,
    side: ArmSide,
    model: KinematicModel,
    planner: TargetPlanner,
    compensator: ForceCompensator,
    mapper: CartesianToJointMapper,
    regulators: JointArray<CascadeRegulator>,
    lifecycle: Lifecycle,
}

impl<I: JointIo> ControlCycle<I> {
    /// 校验配置、解析名称并复位到初始构型
    ///
    /// 任一名称无法解析时立即失败，不会产生部分初始化的控制周期。
    pub fn bind(io: &mut I, config: &ArmConfig) -> Result<Self> {
        config.validate()?;
        let bindings = ArmBindings::resolve(io, config)?;

        let mut cycle = Self {
            bindings,
            side: config.side,
            model: KinematicModel::new(config.link_length)?,
            planner: TargetPlanner::new(config.planner.clone()),
            compensator: ForceCompensator::new(config.force.clone()),
            mapper: CartesianToJointMapper::new(config.mapper.clone()),
            regulators: JointArray::from_fn(|_| CascadeRegulator::new(config.regulator.clone())),
            lifecycle: Lifecycle::Uninitialized,
        };
        cycle.reset(io);

        info!(side = %config.side, ?bindings, "Control cycle bound");
        Ok(cycle)
    }

    pub fn side(&self) -> ArmSide {
        self.side
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn bindings(&self) -> &ArmBindings<I::Handle> {
        &self.bindings
    }

    pub fn regulator(&self, joint: Joint) -> &CascadeRegulator {
        &self.regulators[joint]
    }

    pub fn regulator_mut(&mut self, joint: Joint) -> &mut CascadeRegulator {
        &mut self.regulators[joint]
    }

    pub fn mapper(&self) -> &CartesianToJointMapper {
        &self.mapper
    }

    pub fn model(&self) -> &KinematicModel {
        &self.model
    }

    pub fn planner(&self) -> &TargetPlanner {
        &self.planner
    }

    /// 复位
    ///
    /// 调节器与笛卡尔积分清零，位置目标设为初始构型，关节瞬移到初始构型，
    /// 生命周期回到 `Uninitialized`。
    pub fn reset(&mut self, io: &mut I) {
        let home = self.side.home_angles();
        for joint in Joint::ALL {
            let regulator = &mut self.regulators[joint];
            regulator.reset();
            regulator.set_position_target(home[joint]);
            io.set_angle(self.bindings.joints[joint], home[joint]);
        }
        self.mapper.reset();
        self.lifecycle = Lifecycle::Uninitialized;

        info!(side = %self.side, shoulder = %home[Joint::Shoulder], elbow = %home[Joint::Elbow], "Arm reset to home configuration");
    }

    /// 执行一个控制周期
    ///
    /// 反馈中出现非有限值时返回 [`ControlError::NonFiniteFeedback`]，不写力矩、不推进积分，
    /// 但时间戳照常前移：被拒绝的时间段不计入下一周期的 `dt`。
    pub fn tick(&mut self, io: &mut I, now: Duration) -> Result<TickOutcome> {
        let (origin, last) = match self.lifecycle {
            Lifecycle::Uninitialized => return Ok(self.setup(io, now)),
            Lifecycle::Active { origin, last } => (origin, last),
        };

        let dt = match now.checked_sub(last) {
            Some(dt) if !dt.is_zero() => dt,
            _ => return Ok(self.hold(io, now, last)),
        };
        // 反馈校验失败时本周期作废，下一周期的 dt 从这里起算
        self.lifecycle = Lifecycle::Active { origin, last: now };

        let feedback = self.read_feedback(io)?;
        let wrench = io.force_torque(self.bindings.sensor);
        if !wrench.is_finite() {
            return Err(ControlError::non_finite("sensor wrench", first_non_finite(&wrench)));
        }
        let base = io.link_position(self.bindings.base);
        if !(base.x.is_finite() && base.y.is_finite()) {
            let value = if base.x.is_finite() { base.y } else { base.x };
            return Err(ControlError::non_finite("base link position", value));
        }

        let elapsed = now.saturating_sub(origin).as_secs_f64();
        let dt = dt.as_secs_f64();

        let kinematics = self.model.evaluate(feedback.map(|f| f.angle), base);
        let target = self.planner.target(elapsed, self.side);
        let compensation = self.compensator.compensate(&wrench, &kinematics.output);

        let position_error = target - kinematics.output.translation() + compensation.position_bias;
        let mapping = self.mapper.map(
            position_error,
            compensation.velocity_bias,
            &kinematics.sensitivities,
            dt,
        );

        let mut torques = JointArray::splat(NewtonMeter::ZERO);
        for joint in Joint::ALL {
            let regulator = &mut self.regulators[joint];
            regulator.set_speed2_target(mapping.commands[joint]);
            torques[joint] = regulator.step(feedback[joint], dt);
            io.apply_torque(self.bindings.joints[joint], torques[joint]);
        }

        trace!(
            elapsed,
            dt,
            target_x = target.x,
            target_y = target.y,
            err_x = position_error.x,
            err_y = position_error.y,
            tau0 = torques[Joint::Shoulder].0,
            tau1 = torques[Joint::Elbow].0,
            "Control tick"
        );

        Ok(TickOutcome::Applied(TickReport {
            context: ControlContext {
                elapsed,
                dt,
                side: self.side,
                kinematics,
            },
            feedback,
            target,
            position_error,
            compensation,
            mapping,
            torques,
        }))
    }

    fn setup(&mut self, io: &mut I, now: Duration) -> TickOutcome {
        for joint in Joint::ALL {
            io.enable_feedback(self.bindings.joints[joint]);
        }
        io.enable_feedback(self.bindings.sensor);
        self.lifecycle = Lifecycle::Active {
            origin: now,
            last: now,
        };
        info!(side = %self.side, at = ?now, "Control cycle initialized");
        TickOutcome::Setup
    }

    fn hold(&mut self, io: &mut I, now: Duration, last: Duration) -> TickOutcome {
        if now < last {
            warn!(?now, ?last, "Clock moved backwards, holding previous torque");
        } else {
            debug!(?now, "Zero time step, holding previous torque");
        }
        let torques = self.regulators.clone().map(|r| r.torque());
        for joint in Joint::ALL {
            io.apply_torque(self.bindings.joints[joint], torques[joint]);
        }
        TickOutcome::Held { torques }
    }

    fn read_feedback(&self, io: &I) -> Result<JointArray<JointFeedback>> {
        let mut feedback = JointArray::splat(JointFeedback::default());
        for joint in Joint::ALL {
            let handle = self.bindings.joints[joint];
            let angle = io.angle(handle);
            if !angle.is_finite() {
                return Err(ControlError::non_finite(format!("{} angle", joint), angle.0));
            }
            let velocity = io.velocity(handle);
            if !velocity.is_finite() {
                return Err(ControlError::non_finite(format!("{} velocity", joint), velocity.0));
            }
            feedback[joint] = JointFeedback::new(angle, velocity);
        }
        Ok(feedback)
    }
}

fn first_non_finite(wrench: &ForceTorque) -> f64 {
    wrench
        .force
        .iter()
        .chain(wrench.torque.iter())
        .copied()
        .find(|v| !v.is_finite())
        .unwrap_or(f64::NAN)
}

impl<I: JointIo> Controller<I> for ControlCycle<I> {
    type Output = TickOutcome;
    type Error = ControlError;

    fn tick(&mut self, io: &mut I, now: Duration) -> Result<TickOutcome> {
        ControlCycle::tick(self, io, now)
    }

    fn on_time_jump(&mut self, real_dt: Duration) -> Result<()> {
        warn!(?real_dt, "Control loop time jump detected");
        Ok(())
    }

    fn reset(&mut self, io: &mut I) -> Result<()> {
        ControlCycle::reset(self, io);
        Ok(())
    }
}
