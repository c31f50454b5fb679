//! Loop Runner - 控制循环包装器
//!
//! 以固定频率驱动 [`Controller`]，处理定时、dt 钳位与时间跳变。
//!
//! # 核心功能
//!
//! - **精确定时**: `run_controller_spin` 使用 `spin_sleep` 实现低抖动延时
//! - **虚拟时钟**: 传给控制器的 `now` 按钳位后的 dt 累加，卡顿不会造成时间突变
//! - **时间跳变处理**: 实际间隔超过 `dt_clamp_multiplier × 周期` 时先调用 `on_time_jump()`
//! - **错误传播**: 控制器错误原样向上传播
//!
//! # 使用场景
//!
//! ```rust,ignore
//! use twinlink_control::control::{run_controller_spin, ControlCycle, LoopConfig};
//!
//! let mut cycle = ControlCycle::bind(&mut plant, &ArmConfig::default())?;
//! let config = LoopConfig {
//!     frequency_hz: 1000.0,
//!     dt_clamp_multiplier: 2.0,
//!     max_iterations: Some(20_000),
//! };
//! let stats = run_controller_spin(&mut plant, &mut cycle, &config)?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use spin_sleep::SpinSleeper;
use tracing::{debug, warn};

use super::controller::Controller;
use crate::io::JointIo;
use crate::types::ControlError;

/// 控制循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// 控制频率（Hz）
    pub frequency_hz: f64,

    /// dt 钳位倍数
    ///
    /// 实际 dt 超过 `dt_clamp_multiplier / frequency_hz` 时触发 `on_time_jump()` 并钳位。
    pub dt_clamp_multiplier: f64,

    /// 最大迭代次数（None 表示无限循环）
    pub max_iterations: Option<usize>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: 1000.0,
            dt_clamp_multiplier: 2.0,
            max_iterations: None,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ControlError> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(ControlError::invalid_parameter(
                "frequency_hz",
                format!("{} (must be > 0)", self.frequency_hz),
            ));
        }
        if self.frequency_hz > 10000.0 {
            warn!(
                "Very high control frequency: {} Hz. This may cause performance issues.",
                self.frequency_hz
            );
        }
        if !(self.dt_clamp_multiplier.is_finite() && self.dt_clamp_multiplier > 0.0) {
            return Err(ControlError::invalid_parameter(
                "dt_clamp_multiplier",
                format!("{} (must be > 0)", self.dt_clamp_multiplier),
            ));
        }
        Ok(())
    }

    pub fn nominal_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frequency_hz)
    }

    pub fn max_dt(&self) -> Duration {
        self.nominal_period().mul_f64(self.dt_clamp_multiplier)
    }
}

/// 循环结束时的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub iterations: usize,
    /// 触发 `on_time_jump()` 的次数
    pub time_jumps: usize,
    /// 虚拟时钟最终值
    pub elapsed: Duration,
}

/// 运行控制循环（`std::thread::sleep` 定时）
///
/// 阻塞直到发生错误或达到 `max_iterations`。
pub fn run_controller<I, C>(io: &mut I, controller: &mut C, config: &LoopConfig) -> Result<LoopStats, ControlError>
where
    I: JointIo,
    C: Controller<I>,
    ControlError: From<C::Error>,
{
    run_loop(io, controller, config, None, std::thread::sleep)
}

/// 使用 spin_sleep 的高精度控制循环
///
/// ⚠️ **注意**: `spin_sleep` 会占用更多 CPU，适合对实时性要求极高的场景。
pub fn run_controller_spin<I, C>(io: &mut I, controller: &mut C, config: &LoopConfig) -> Result<LoopStats, ControlError>
where
    I: JointIo,
    C: Controller<I>,
    ControlError: From<C::Error>,
{
    let sleeper = SpinSleeper::default();
    run_loop(io, controller, config, None, |d| sleeper.sleep(d))
}

/// 与 [`run_controller_spin`] 相同，但在 `stop` 置位后于下一周期退出（如 Ctrl+C）
pub fn run_controller_spin_until<I, C>(
    io: &mut I,
    controller: &mut C,
    config: &LoopConfig,
    stop: &AtomicBool,
) -> Result<LoopStats, ControlError>
where
    I: JointIo,
    C: Controller<I>,
    ControlError: From<C::Error>,
{
    let sleeper = SpinSleeper::default();
    run_loop(io, controller, config, Some(stop), |d| sleeper.sleep(d))
}

fn run_loop<I, C, S>(
    io: &mut I,
    controller: &mut C,
    config: &LoopConfig,
    stop: Option<&AtomicBool>,
    mut sleep: S,
) -> Result<LoopStats, ControlError>
where
    I: JointIo,
    C: Controller<I>,
    ControlError: From<C::Error>,
    S: FnMut(Duration),
{
    config.validate()?;

    let nominal_period = config.nominal_period();
    let max_dt = config.max_dt();

    let mut stats = LoopStats::default();
    let mut clock = Duration::ZERO;
    let mut last_time = Instant::now();

    loop {
        if config.max_iterations.is_some_and(|max| stats.iterations >= max) {
            break;
        }
        if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
            debug!("Stop requested");
            break;
        }

        let now = Instant::now();
        let real_dt = now - last_time;
        let mut dt = real_dt;

        if stats.iterations > 0 && real_dt > max_dt {
            controller.on_time_jump(real_dt)?;
            stats.time_jumps += 1;
            dt = max_dt;
        }

        if stats.iterations > 0 {
            clock += dt;
        }
        controller.tick(io, clock)?;

        last_time = now;
        stats.iterations += 1;

        sleep(nominal_period);
    }

    stats.elapsed = clock;
    Ok(stats)
}
