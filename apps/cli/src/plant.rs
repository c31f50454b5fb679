//! 内置仿真对象
//!
//! 两个受控关节各自按 `J·ω' = τ - b·ω` 积分（半隐式欧拉），
//! 传感关节不动且不报告接触力，基座连杆固定在原点。

use std::time::Duration;

use twinlink_sdk::control::config::JointNames;
use twinlink_sdk::prelude::{ForceTorque, JointIo, NewtonMeter, Rad, RadPerSec, Vector2};

const SHOULDER: usize = 0;
const ELBOW: usize = 1;
const SENSOR: usize = 2;

/// 仿真关节句柄（关节数组下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantHandle(usize);

pub struct SimPlant {
    names: JointNames,
    angles: [f64; 3],
    velocities: [f64; 3],
    torques: [f64; 3],
    feedback: [bool; 3],
    base: Vector2<f64>,
    /// 转动惯量（kg·m²）
    pub inertia: f64,
    /// 粘滞阻尼（N·m·s/rad）
    pub damping: f64,
    time: Duration,
}

impl SimPlant {
    pub fn new(names: &JointNames) -> Self {
        Self {
            names: names.clone(),
            angles: [0.0; 3],
            velocities: [0.0; 3],
            torques: [0.0; 3],
            feedback: [false; 3],
            base: Vector2::zeros(),
            inertia: 0.1,
            damping: 0.1,
            time: Duration::ZERO,
        }
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn feedback_enabled(&self) -> bool {
        self.feedback.iter().all(|&f| f)
    }

    /// 推进 `dt`
    pub fn step(&mut self, dt: Duration) {
        let h = dt.as_secs_f64();
        for i in [SHOULDER, ELBOW] {
            let accel = (self.torques[i] - self.damping * self.velocities[i]) / self.inertia;
            self.velocities[i] += accel * h;
            self.angles[i] += self.velocities[i] * h;
        }
        self.time += dt;
    }
}

impl JointIo for SimPlant {
    type Handle = PlantHandle;

    fn joint(&self, name: &str) -> Option<PlantHandle> {
        if name == self.names.shoulder {
            Some(PlantHandle(SHOULDER))
        } else if name == self.names.elbow {
            Some(PlantHandle(ELBOW))
        } else if name == self.names.sensor {
            Some(PlantHandle(SENSOR))
        } else {
            None
        }
    }

    fn link(&self, name: &str) -> Option<PlantHandle> {
        (name == self.names.base_link).then_some(PlantHandle(0))
    }

    fn enable_feedback(&mut self, joint: PlantHandle) {
        self.feedback[joint.0] = true;
    }

    fn angle(&self, joint: PlantHandle) -> Rad {
        Rad(self.angles[joint.0])
    }

    fn velocity(&self, joint: PlantHandle) -> RadPerSec {
        RadPerSec(self.velocities[joint.0])
    }

    fn force_torque(&self, _joint: PlantHandle) -> ForceTorque {
        ForceTorque::zero()
    }

    fn link_position(&self, _link: PlantHandle) -> Vector2<f64> {
        self.base
    }

    fn apply_torque(&mut self, joint: PlantHandle, torque: NewtonMeter) {
        self.torques[joint.0] = torque.0;
    }

    fn set_angle(&mut self, joint: PlantHandle, angle: Rad) {
        self.angles[joint.0] = angle.0;
        self.velocities[joint.0] = 0.0;
        self.torques[joint.0] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_configured_names() {
        let plant = SimPlant::new(&JointNames::default());
        assert_eq!(plant.joint("joint0"), Some(PlantHandle(SHOULDER)));
        assert_eq!(plant.joint("joint2"), Some(PlantHandle(SENSOR)));
        assert_eq!(plant.joint("joint9"), None);
        assert!(plant.link("link_0").is_some());
        assert!(plant.link("link_1").is_none());
    }

    #[test]
    fn test_constant_torque_accelerates() {
        let mut plant = SimPlant::new(&JointNames::default());
        plant.apply_torque(PlantHandle(SHOULDER), NewtonMeter(0.1));
        for _ in 0..100 {
            plant.step(Duration::from_millis(1));
        }
        assert!(plant.velocities[SHOULDER] > 0.0);
        assert!(plant.angles[SHOULDER] > 0.0);
        assert_eq!(plant.angles[ELBOW], 0.0);
        assert_eq!(plant.time(), Duration::from_millis(100));
    }

    #[test]
    fn test_set_angle_stops_joint() {
        let mut plant = SimPlant::new(&JointNames::default());
        plant.apply_torque(PlantHandle(ELBOW), NewtonMeter(1.0));
        plant.step(Duration::from_millis(10));
        plant.set_angle(PlantHandle(ELBOW), Rad(0.5));
        assert_eq!(plant.angle(PlantHandle(ELBOW)), Rad(0.5));
        assert_eq!(plant.velocity(PlantHandle(ELBOW)), RadPerSec::ZERO);
    }
}
