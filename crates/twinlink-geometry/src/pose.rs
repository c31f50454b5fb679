//! 平面刚体位姿

use std::fmt;
use std::ops::Mul;

use approx::AbsDiffEq;
use nalgebra::{Rotation2, Vector2};

use crate::screw::Screw2;

/// 平面刚体变换（旋转角 + 平移）
///
/// 组合满足结合律，且每个位姿都有唯一的逆。
/// 角度不做归一化，组合时直接相加。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose2 {
    angle: f64,
    translation: Vector2<f64>,
}

impl Pose2 {
    pub fn new(angle: f64, translation: Vector2<f64>) -> Self {
        Self { angle, translation }
    }

    pub fn identity() -> Self {
        Self::new(0.0, Vector2::zeros())
    }

    /// 纯平移
    pub fn from_translation(translation: Vector2<f64>) -> Self {
        Self::new(0.0, translation)
    }

    /// 绕原点的纯旋转
    pub fn from_rotation(angle: f64) -> Self {
        Self::new(angle, Vector2::zeros())
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn translation(&self) -> Vector2<f64> {
        self.translation
    }

    #[inline]
    pub fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.angle)
    }

    /// 逆变换：`p.inverse() * p == identity`
    pub fn inverse(&self) -> Self {
        let inv_rot = Rotation2::new(-self.angle);
        Self::new(-self.angle, -(inv_rot * self.translation))
    }

    /// 仅旋转向量（不平移）
    pub fn rotate_vector(&self, v: Vector2<f64>) -> Vector2<f64> {
        self.rotation() * v
    }

    /// 将局部坐标系中的点变换到父坐标系
    pub fn transform_point(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.translation + self.rotate_vector(p)
    }

    /// 将局部坐标系中的旋量旋转到父坐标系
    ///
    /// 只旋转线速度分量；平面内角速度与坐标系朝向无关。
    pub fn rotate_screw(&self, screw: Screw2) -> Screw2 {
        Screw2::new(screw.angular, self.rotate_vector(screw.linear))
    }
}

impl Default for Pose2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Pose2 {
    type Output = Pose2;

    fn mul(self, rhs: Pose2) -> Pose2 {
        Pose2::new(self.angle + rhs.angle, self.transform_point(rhs.translation))
    }
}

impl Mul<&Pose2> for &Pose2 {
    type Output = Pose2;

    fn mul(self, rhs: &Pose2) -> Pose2 {
        *self * *rhs
    }
}

impl fmt::Display for Pose2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pose2(θ={:.4} rad, t=[{:.4}, {:.4}])",
            self.angle, self.translation.x, self.translation.y
        )
    }
}

impl AbsDiffEq for Pose2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    /// 角度在单位圆上比较，`θ` 与 `θ + 2π` 视为相等
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let (s0, c0) = self.angle.sin_cos();
        let (s1, c1) = other.angle.sin_cos();
        s0.abs_diff_eq(&s1, epsilon)
            && c0.abs_diff_eq(&c1, epsilon)
            && self.translation.abs_diff_eq(&other.translation, epsilon)
    }
}
