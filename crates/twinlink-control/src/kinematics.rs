//! 正运动学与运动灵敏度
//!
//! 两根等长连杆，关节角正方向为顺时针（在位姿链中以 `-θ` 出现）：
//!
//! ```text
//! J0 = T(base)
//! J1 = J0 · R(-θ0) · T(0, L)
//! E  = J1 · R(-θ1) · T(0, L)
//! ```
//!
//! 关节 i 的灵敏度向量是末端位置对 `θi` 的偏导，即雅可比矩阵的第 i 列。
//! 计算方式：在关节原点放一个单位旋量 `(ω = -1, v = 0)`，搬运到末端，
//! 再旋转回全局坐标系，取线速度分量。

use nalgebra::Vector2;
use twinlink_geometry::{Pose2, Screw2};

use crate::types::{ControlError, Joint, JointArray, Rad};

/// 单次正运动学的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    /// 各关节坐标系（位于关节原点，尚未施加该关节自身的转角）
    pub joint_poses: JointArray<Pose2>,
    /// 末端位姿
    pub output: Pose2,
    /// 各关节的灵敏度向量 `∂E/∂θi`
    pub sensitivities: JointArray<Vector2<f64>>,
}

impl KinematicState {
    /// 灵敏度矩阵的行列式（0 表示奇异构型）
    pub fn sensitivity_determinant(&self) -> f64 {
        let v0 = self.sensitivities[Joint::Shoulder];
        let v1 = self.sensitivities[Joint::Elbow];
        v0.x * v1.y - v0.y * v1.x
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicModel {
    link_length: f64,
}

impl KinematicModel {
    /// 默认连杆长度（m）
    pub const DEFAULT_LINK_LENGTH: f64 = 0.8;

    pub fn new(link_length: f64) -> Result<Self, ControlError> {
        if !link_length.is_finite() || link_length < 0.0 {
            return Err(ControlError::invalid_parameter(
                "link_length",
                format!("must be finite and >= 0, got {}", link_length),
            ));
        }
        Ok(Self { link_length })
    }

    pub fn link_length(&self) -> f64 {
        self.link_length
    }

    /// 正运动学 + 灵敏度
    ///
    /// 纯函数：相同输入得到逐位相同的输出。
    pub fn evaluate(&self, angles: JointArray<Rad>, base: Vector2<f64>) -> KinematicState {
        let link = Pose2::from_translation(Vector2::new(0.0, self.link_length));

        let shoulder = Pose2::from_translation(base);
        let elbow = shoulder * Pose2::from_rotation(-angles[Joint::Shoulder].0) * link;
        let output = elbow * Pose2::from_rotation(-angles[Joint::Elbow].0) * link;

        let joint_poses = JointArray::new([shoulder, elbow]);
        let sensitivities = joint_poses.map(|pose| sensitivity(&pose, &output));

        KinematicState {
            joint_poses,
            output,
            sensitivities,
        }
    }
}

impl Default for KinematicModel {
    fn default() -> Self {
        Self {
            link_length: Self::DEFAULT_LINK_LENGTH,
        }
    }
}

fn sensitivity(joint: &Pose2, output: &Pose2) -> Vector2<f64> {
    let unit = Screw2::new(-1.0, Vector2::zeros());
    let arm = (joint.inverse() * *output).translation();
    joint.rotate_screw(unit.carry(arm)).linear
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn angles(a: f64, b: f64) -> JointArray<Rad> {
        JointArray::new([Rad(a), Rad(b)])
    }

    #[test]
    fn test_straight_up() {
        let model = KinematicModel::default();
        let state = model.evaluate(angles(0.0, 0.0), Vector2::new(1.0, 0.5));
        assert_abs_diff_eq!(state.output.translation(), Vector2::new(1.0, 2.1), epsilon = 1e-12);
        assert_abs_diff_eq!(
            state.joint_poses[Joint::Elbow].translation(),
            Vector2::new(1.0, 1.3),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(state.sensitivities[Joint::Shoulder], Vector2::new(1.6, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(state.sensitivities[Joint::Elbow], Vector2::new(0.8, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_home_configuration() {
        // 镜像臂初始构型：肩 -π/4，肘 +π/2，末端位于基座正上方
        let model = KinematicModel::default();
        let state = model.evaluate(angles(-FRAC_PI_4, FRAC_PI_2), Vector2::zeros());
        let expected_height = 2.0 * 0.8 * FRAC_PI_4.cos();
        assert_abs_diff_eq!(state.output.translation(), Vector2::new(0.0, expected_height), epsilon = 1e-12);
        assert!(state.sensitivity_determinant().abs() > 0.1);
    }

    #[test]
    fn test_zero_link_length_collapses_sensitivities() {
        let model = KinematicModel::new(0.0).unwrap();
        let state = model.evaluate(angles(0.4, -1.1), Vector2::new(0.2, 0.3));
        assert_eq!(state.sensitivities[Joint::Shoulder], Vector2::zeros());
        assert_eq!(state.sensitivities[Joint::Elbow], Vector2::zeros());
        assert_abs_diff_eq!(state.output.translation(), Vector2::new(0.2, 0.3), epsilon = 1e-12);
    }

    #[test]
    fn test_collinear_links_are_singular() {
        let model = KinematicModel::default();
        let state = model.evaluate(angles(0.7, 0.0), Vector2::zeros());
        assert_abs_diff_eq!(state.sensitivity_determinant(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sensitivity_matches_finite_difference() {
        let model = KinematicModel::default();
        let base = Vector2::new(-0.3, 0.1);
        let (a, b) = (0.37, -1.21);
        let h = 1e-6;
        let state = model.evaluate(angles(a, b), base);

        let d0 = (model.evaluate(angles(a + h, b), base).output.translation()
            - model.evaluate(angles(a - h, b), base).output.translation())
            / (2.0 * h);
        let d1 = (model.evaluate(angles(a, b + h), base).output.translation()
            - model.evaluate(angles(a, b - h), base).output.translation())
            / (2.0 * h);

        assert_abs_diff_eq!(state.sensitivities[Joint::Shoulder], d0, epsilon = 1e-6);
        assert_abs_diff_eq!(state.sensitivities[Joint::Elbow], d1, epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_is_bit_identical() {
        let model = KinematicModel::default();
        let a = model.evaluate(angles(1.234, -0.567), Vector2::new(0.1, 0.2));
        let b = model.evaluate(angles(1.234, -0.567), Vector2::new(0.1, 0.2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_negative_link_length() {
        assert!(KinematicModel::new(-0.1).is_err());
        assert!(KinematicModel::new(f64::NAN).is_err());
    }
}
