//! Controller trait - 控制器通用接口
//!
//! # 设计理念
//!
//! - **Tick 模式**: 外部驱动循环，控制器只负责一个周期的计算与写回
//! - **时间感知**: 显式传入单调时间 `now`，便于单元测试
//! - **错误处理**: 关联类型 `Error` 允许自定义错误
//!
//! # 时间跳变处理
//!
//! 循环检测到实际间隔远超标称周期时（卡顿、调度延迟），
//! 会先调用 `on_time_jump()`，再以钳位后的时间推进 `now`。

use std::time::Duration;

use crate::io::JointIo;

/// 控制器通用接口
///
/// `I` 是控制器读写关节的后端。
pub trait Controller<I: JointIo> {
    /// 单个周期的输出（诊断信息）
    type Output;

    /// 控制器错误类型
    type Error: std::error::Error + Send + 'static;

    /// 执行一个周期
    ///
    /// `now` 必须单调不减；控制器自行计算与上一周期的间隔。
    fn tick(&mut self, io: &mut I, now: Duration) -> Result<Self::Output, Self::Error>;

    /// 处理时间跳变
    ///
    /// `real_dt` 为钳位前的实际间隔。默认什么都不做。
    fn on_time_jump(&mut self, _real_dt: Duration) -> Result<(), Self::Error> {
        Ok(())
    }

    /// 重置控制器到初始状态
    fn reset(&mut self, _io: &mut I) -> Result<(), Self::Error> {
        Ok(())
    }
}
