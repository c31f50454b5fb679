//! 平面旋量（速度状态）

use approx::AbsDiffEq;
use nalgebra::Vector2;

/// 标量角速度与二维向量的叉积：`ω × (x, y) = (-ω·y, ω·x)`
#[inline]
pub fn cross(angular: f64, arm: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-angular * arm.y, angular * arm.x)
}

/// 平面旋量
///
/// 描述附着在某一参考点上的刚体速度状态：标量角速度 + 二维线速度。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screw2 {
    /// 角速度（rad/s，逆时针为正）
    pub angular: f64,
    /// 参考点处的线速度
    pub linear: Vector2<f64>,
}

impl Screw2 {
    pub const fn new(angular: f64, linear: Vector2<f64>) -> Self {
        Self { angular, linear }
    }

    pub fn zero() -> Self {
        Self::new(0.0, Vector2::zeros())
    }

    /// 将旋量搬运到偏移 `arm` 的另一点
    ///
    /// 角速度不变，线速度叠加 `ω × arm`。
    pub fn carry(&self, arm: Vector2<f64>) -> Self {
        Self {
            angular: self.angular,
            linear: self.linear + cross(self.angular, arm),
        }
    }
}

impl AbsDiffEq for Screw2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.angular.abs_diff_eq(&other.angular, epsilon)
            && self.linear.abs_diff_eq(&other.linear, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cross_is_perpendicular() {
        let arm = Vector2::new(0.3, -1.2);
        let v = cross(2.5, arm);
        assert_abs_diff_eq!(v.dot(&arm), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.norm(), 2.5 * arm.norm(), epsilon = 1e-12);
    }

    #[test]
    fn test_cross_orientation() {
        // 逆时针旋转时，x 轴上的点向 +y 运动
        let v = cross(1.0, Vector2::new(1.0, 0.0));
        assert_eq!(v, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_carry_keeps_angular() {
        let s = Screw2::new(-1.0, Vector2::new(0.5, 0.5));
        let carried = s.carry(Vector2::new(0.0, 1.6));
        assert_eq!(carried.angular, -1.0);
        assert_abs_diff_eq!(carried.linear, Vector2::new(2.1, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_carry_zero_arm_is_identity() {
        let s = Screw2::new(3.0, Vector2::new(-0.2, 0.7));
        assert_eq!(s.carry(Vector2::zeros()), s);
    }

    #[test]
    fn test_zero_screw_carries_to_zero() {
        let s = Screw2::zero().carry(Vector2::new(4.0, -9.0));
        assert_eq!(s, Screw2::zero());
    }
}
