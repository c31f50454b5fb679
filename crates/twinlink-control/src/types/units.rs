//! 强类型单位系统
//!
//! 使用 NewType 模式区分角度、角速度与力矩，在编译期保证类型安全。
//!
//! # 示例
//!
//! ```rust
//! use twinlink_control::types::{Rad, RadPerSec};
//!
//! let limit = RadPerSec(3.0);
//! let command = RadPerSec(4.2).clamp(-limit, limit);
//! assert_eq!(command, RadPerSec(3.0));
//! assert_eq!(Rad(0.5) + Rad(0.25), Rad(0.75));
//!
//! // 类型安全：以下代码无法编译
//! // let _ = Rad(1.0) + RadPerSec(1.0);  // ❌ 类型不匹配
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 为标量 NewType 生成算术运算符
macro_rules! scalar_unit_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $ty(self.0 + rhs.0)
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $ty(self.0 - rhs.0)
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Mul<f64> for $ty {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f64) -> Self {
                $ty(self.0 * rhs)
            }
        }

        impl Mul<$ty> for f64 {
            type Output = $ty;
            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                $ty(self * rhs.0)
            }
        }

        impl Div<f64> for $ty {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f64) -> Self {
                $ty(self.0 / rhs)
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                $ty(-self.0)
            }
        }

        impl $ty {
            /// 零值常量
            pub const ZERO: Self = $ty(0.0);

            #[inline]
            pub const fn new(value: f64) -> Self {
                $ty(value)
            }

            /// 获取原始值
            #[inline]
            pub fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn abs(self) -> Self {
                $ty(self.0.abs())
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// 限制范围
            #[inline]
            pub fn clamp(self, min: Self, max: Self) -> Self {
                $ty(self.0.clamp(min.0, max.0))
            }
        }
    };
}

/// 弧度（NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rad(pub f64);

/// 角速度（rad/s）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadPerSec(pub f64);

/// 力矩（N·m）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonMeter(pub f64);

scalar_unit_ops!(Rad);
scalar_unit_ops!(RadPerSec);
scalar_unit_ops!(NewtonMeter);

impl fmt::Display for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

impl fmt::Display for RadPerSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad/s", self.0)
    }
}

impl fmt::Display for NewtonMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} N·m", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rad_arithmetic() {
        let a = Rad(1.0);
        let b = Rad(0.5);
        assert_eq!(a + b, Rad(1.5));
        assert_eq!(a - b, Rad(0.5));
        assert_eq!(a * 2.0, Rad(2.0));
        assert_eq!(2.0 * a, Rad(2.0));
        assert_eq!(a / 2.0, Rad(0.5));
        assert_eq!(-a, Rad(-1.0));
    }

    #[test]
    fn test_assign_ops() {
        let mut t = NewtonMeter(1.0);
        t += NewtonMeter(2.0);
        assert_eq!(t, NewtonMeter(3.0));
        t -= NewtonMeter(0.5);
        assert_eq!(t, NewtonMeter(2.5));
    }

    #[test]
    fn test_clamp() {
        let v = RadPerSec(5.0).clamp(RadPerSec(-3.0), RadPerSec(3.0));
        assert_eq!(v, RadPerSec(3.0));
        let v = RadPerSec(-7.5).clamp(RadPerSec(-3.0), RadPerSec(3.0));
        assert_eq!(v, RadPerSec(-3.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Rad(0.3).is_finite());
        assert!(!Rad(f64::NAN).is_finite());
        assert!(!RadPerSec(f64::INFINITY).is_finite());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Rad(1.23456)), "1.2346 rad");
        assert_eq!(format!("{}", RadPerSec(0.5)), "0.5000 rad/s");
        assert_eq!(format!("{}", NewtonMeter(12.3456)), "12.346 N·m");
    }
}
