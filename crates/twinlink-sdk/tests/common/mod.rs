//! 集成测试公共工具

#![allow(dead_code)]

pub mod mock_joints;

use std::time::Duration;

pub use mock_joints::MockJoints;

/// 毫秒转 `Duration`
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
