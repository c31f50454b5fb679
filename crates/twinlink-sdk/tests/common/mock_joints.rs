//! Mock 关节后端
//!
//! 按名称注册关节与连杆，记录所有写入的力矩；
//! 可选地用简单的一阶刚体模型推进两个受控关节（`J·ω' = τ - b·ω`）。

use std::collections::HashMap;

use twinlink_sdk::prelude::*;

/// 单个模拟关节的状态
#[derive(Debug, Clone, PartialEq)]
pub struct MockJointState {
    pub angle: f64,
    pub velocity: f64,
    /// 最近一次写入的力矩
    pub torque: f64,
    pub feedback_enabled: bool,
    pub wrench: ForceTorque,
}

impl Default for MockJointState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            torque: 0.0,
            feedback_enabled: false,
            wrench: ForceTorque::zero(),
        }
    }
}

/// 模拟关节后端
pub struct MockJoints {
    joint_names: HashMap<String, usize>,
    link_names: HashMap<String, usize>,
    pub joints: Vec<MockJointState>,
    pub links: Vec<Vector2<f64>>,
    /// 所有 `apply_torque` 调用（关节句柄，力矩）
    pub torque_log: Vec<(usize, f64)>,
    /// 受控关节转动惯量（kg·m²）
    pub inertia: f64,
    /// 粘滞阻尼（N·m·s/rad）
    pub damping: f64,
}

impl MockJoints {
    /// 默认拓扑：joint0、joint1、joint2（传感），基座连杆 link_0 位于原点
    pub fn new() -> Self {
        Self::with_names(&["joint0", "joint1", "joint2"], &["link_0"])
    }

    pub fn with_names(joints: &[&str], links: &[&str]) -> Self {
        Self {
            joint_names: joints.iter().enumerate().map(|(i, n)| (n.to_string(), i)).collect(),
            link_names: links.iter().enumerate().map(|(i, n)| (n.to_string(), i)).collect(),
            joints: vec![MockJointState::default(); joints.len()],
            links: vec![Vector2::zeros(); links.len()],
            torque_log: Vec::new(),
            inertia: 0.1,
            damping: 0.1,
        }
    }

    pub fn handle(&self, name: &str) -> usize {
        self.joint_names[name]
    }

    pub fn angle_of(&self, name: &str) -> f64 {
        self.joints[self.handle(name)].angle
    }

    pub fn set_wrench(&mut self, name: &str, force: Vector3<f64>) {
        let h = self.handle(name);
        self.joints[h].wrench = ForceTorque::new(force, Vector3::zeros());
    }

    /// 推进受控关节（joint0、joint1）的动力学
    pub fn step(&mut self, dt: f64) {
        for name in ["joint0", "joint1"] {
            let Some(&h) = self.joint_names.get(name) else {
                continue;
            };
            let j = &mut self.joints[h];
            let accel = (j.torque - self.damping * j.velocity) / self.inertia;
            j.velocity += accel * dt;
            j.angle += j.velocity * dt;
        }
    }
}

impl JointIo for MockJoints {
    type Handle = usize;

    fn joint(&self, name: &str) -> Option<usize> {
        self.joint_names.get(name).copied()
    }

    fn link(&self, name: &str) -> Option<usize> {
        self.link_names.get(name).copied()
    }

    fn enable_feedback(&mut self, joint: usize) {
        self.joints[joint].feedback_enabled = true;
    }

    fn angle(&self, joint: usize) -> Rad {
        Rad(self.joints[joint].angle)
    }

    fn velocity(&self, joint: usize) -> RadPerSec {
        RadPerSec(self.joints[joint].velocity)
    }

    fn force_torque(&self, joint: usize) -> ForceTorque {
        self.joints[joint].wrench
    }

    fn link_position(&self, link: usize) -> Vector2<f64> {
        self.links[link]
    }

    fn apply_torque(&mut self, joint: usize, torque: NewtonMeter) {
        self.joints[joint].torque = torque.0;
        self.torque_log.push((joint, torque.0));
    }

    fn set_angle(&mut self, joint: usize, angle: Rad) {
        let j = &mut self.joints[joint];
        j.angle = angle.0;
        j.velocity = 0.0;
    }
}
