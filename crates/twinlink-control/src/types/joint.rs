//! 关节索引和数组
//!
//! 两关节平面机械臂的编译期安全索引。
//!
//! # 示例
//!
//! ```rust
//! use twinlink_control::types::{Joint, JointArray, Rad};
//!
//! let angles = JointArray::new([Rad(-0.78), Rad(1.57)]);
//! assert_eq!(angles[Joint::Elbow], Rad(1.57));
//!
//! let doubled = angles.map(|a| a * 2.0);
//! assert_eq!(doubled[Joint::Shoulder], Rad(-1.56));
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

/// 关节枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint {
    /// 肩关节（连接基座）
    Shoulder = 0,
    /// 肘关节（连接两根连杆）
    Elbow = 1,
}

impl Joint {
    /// 所有关节的数组
    pub const ALL: [Joint; 2] = [Joint::Shoulder, Joint::Elbow];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 关节数组
///
/// 每个关节一个元素，支持按 [`Joint`] 索引与逐元素映射。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointArray<T> {
    data: [T; 2],
}

impl<T: Copy> Copy for JointArray<T> {}

impl<T> JointArray<T> {
    #[inline]
    pub const fn new(data: [T; 2]) -> Self {
        JointArray { data }
    }

    /// 按关节生成数组
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Joint) -> T,
    {
        JointArray::new([f(Joint::Shoulder), f(Joint::Elbow)])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// 映射转换
    pub fn map<U, F>(self, mut f: F) -> JointArray<U>
    where
        F: FnMut(T) -> U,
    {
        let [a, b] = self.data;
        JointArray::new([f(a), f(b)])
    }
}

impl<T: Copy> JointArray<T> {
    /// 创建所有元素相同的数组
    #[inline]
    pub const fn splat(value: T) -> Self {
        JointArray::new([value; 2])
    }
}

impl<T> Index<Joint> for JointArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, joint: Joint) -> &T {
        &self.data[joint.index()]
    }
}

impl<T> IndexMut<Joint> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut T {
        &mut self.data[joint.index()]
    }
}

impl<T> From<[T; 2]> for JointArray<T> {
    fn from(data: [T; 2]) -> Self {
        JointArray::new(data)
    }
}

impl<T> IntoIterator for JointArray<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, 2>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a JointArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
