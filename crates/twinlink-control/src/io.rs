//! 仿真/硬件接口抽象
//!
//! 控制律本身不持有任何物理状态。关节角度、速度、力传感器读数和基座位置
//! 都通过 [`JointIo`] 读取，计算出的力矩也通过它写回。
//!
//! 名称解析只在安装期进行一次，之后的每个周期都使用解析得到的句柄，
//! 避免在高频循环中做字符串查找。

use std::fmt;

use nalgebra::{Vector2, Vector3};

use crate::types::{NewtonMeter, Rad, RadPerSec};

/// 力/力矩读数（传感器报告系）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceTorque {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl ForceTorque {
    pub fn new(force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self { force, torque }
    }

    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    pub fn is_finite(&self) -> bool {
        self.force.iter().chain(self.torque.iter()).all(|v| v.is_finite())
    }
}

impl Default for ForceTorque {
    fn default() -> Self {
        Self::zero()
    }
}

/// 关节级读写能力
///
/// 由仿真插件或测试替身实现。所有读取都是瞬时值；
/// `apply_torque` 在下一次物理步进时生效。
pub trait JointIo {
    /// 关节/连杆句柄
    type Handle: Copy + fmt::Debug;

    /// 按名称解析关节
    fn joint(&self, name: &str) -> Option<Self::Handle>;

    /// 按名称解析连杆
    fn link(&self, name: &str) -> Option<Self::Handle>;

    /// 打开关节的力/力矩反馈
    fn enable_feedback(&mut self, joint: Self::Handle);

    fn angle(&self, joint: Self::Handle) -> Rad;

    fn velocity(&self, joint: Self::Handle) -> RadPerSec;

    /// 关节处的力/力矩读数
    fn force_torque(&self, joint: Self::Handle) -> ForceTorque;

    /// 连杆质心在机械臂平面内的位置（全局 x 与 z 分量）
    fn link_position(&self, link: Self::Handle) -> Vector2<f64>;

    fn apply_torque(&mut self, joint: Self::Handle, torque: NewtonMeter);

    /// 直接设置关节角度（复位到初始构型时使用）
    ///
    /// 默认不做任何事；不支持瞬移的后端可以忽略。
    fn set_angle(&mut self, _joint: Self::Handle, _angle: Rad) {}
}
