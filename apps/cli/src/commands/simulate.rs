//! 闭环仿真命令
//!
//! 把控制周期绑定到内置仿真对象上运行。默认以固定步长离线推进，
//! `--realtime` 时交给定频循环驱动，可用 Ctrl+C 中止。

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use clap::Args;
use tracing::info;
use twinlink_sdk::prelude::*;

use super::SideArg;
use crate::plant::SimPlant;

/// 仿真命令参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 配置文件（缺省使用内置默认值）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 机械臂朝向（覆盖配置文件）
    #[arg(short, long, value_enum)]
    pub side: Option<SideArg>,

    /// 仿真时长（秒）
    #[arg(short, long, default_value_t = 20.0)]
    pub duration: f64,

    /// 控制频率（Hz）
    #[arg(short, long, default_value_t = 1000.0)]
    pub rate: f64,

    /// 按真实时间运行
    #[arg(long)]
    pub realtime: bool,
}

impl SimulateCommand {
    pub fn execute(&self) -> Result<()> {
        ensure!(
            self.duration.is_finite() && self.duration > 0.0,
            "仿真时长必须为正: {}",
            self.duration
        );
        ensure!(
            self.rate.is_finite() && self.rate > 0.0,
            "控制频率必须为正: {}",
            self.rate
        );

        let mut config = match &self.config {
            Some(path) => ArmConfig::load_from_file(path)
                .with_context(|| format!("加载配置失败: {}", path.display()))?,
            None => ArmConfig::default(),
        };
        if let Some(side) = self.side {
            config.side = side.into();
        }

        let mut plant = SimPlant::new(&config.joints);
        let cycle = ControlCycle::bind(&mut plant, &config).context("绑定控制周期失败")?;
        let mut sim = Simulation::new(cycle, true);

        println!(
            "▶️  仿真开始: side={}, duration={:.1} s, rate={:.0} Hz{}",
            config.side,
            self.duration,
            self.rate,
            if self.realtime { " (realtime)" } else { "" }
        );
        print_header();

        let iterations = steps(self.duration, self.rate);
        if self.realtime {
            let stop = Arc::new(AtomicBool::new(false));
            let handler_flag = Arc::clone(&stop);
            ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))
                .context("注册 Ctrl+C 处理器失败")?;

            let loop_config = LoopConfig {
                frequency_hz: self.rate,
                dt_clamp_multiplier: 2.0,
                max_iterations: Some(iterations + 1),
            };
            let stats = run_controller_spin_until(&mut plant, &mut sim, &loop_config, &stop)?;
            info!(?stats, "Realtime loop finished");
            if stats.time_jumps > 0 {
                println!("⚠️  检测到 {} 次时间跳变（已钳位）", stats.time_jumps);
            }
        } else {
            sim.run_fixed_step(&mut plant, iterations, self.rate)?;
        }

        sim.summary().print();
        Ok(())
    }
}

fn steps(duration: f64, rate: f64) -> usize {
    (duration * rate).ceil() as usize
}

fn print_header() {
    println!(
        "{:>7}  {:>17}  {:>17}  {:>8}  {:>9}  {:>9}",
        "t (s)", "target (m)", "output (m)", "err (m)", "τ0 (N·m)", "τ1 (N·m)"
    );
}

/// 仿真过程统计
#[derive(Debug, Clone, Copy, Default)]
pub struct SimSummary {
    pub applied_ticks: usize,
    pub held_ticks: usize,
    pub final_error: Option<f64>,
    pub elapsed: f64,
}

impl SimSummary {
    fn print(&self) {
        match self.final_error {
            Some(err) => println!(
                "✅ 仿真结束: {} 个控制周期, t = {:.3} s, 最终跟踪误差 {:.4} m",
                self.applied_ticks, self.elapsed, err
            ),
            None => println!("⚠️  仿真结束: 没有完成任何控制周期"),
        }
        if self.held_ticks > 0 {
            println!("  保持周期: {}", self.held_ticks);
        }
    }
}

/// 每个周期先按时间差推进仿真对象，再执行控制周期
pub struct Simulation {
    cycle: ControlCycle<SimPlant>,
    last: Option<Duration>,
    next_print: f64,
    verbose: bool,
    summary: SimSummary,
}

impl Simulation {
    pub fn new(cycle: ControlCycle<SimPlant>, verbose: bool) -> Self {
        Self {
            cycle,
            last: None,
            next_print: 0.0,
            verbose,
            summary: SimSummary::default(),
        }
    }

    pub fn summary(&self) -> SimSummary {
        self.summary
    }

    /// 固定步长离线运行 `iterations` 个步长（外加一个安装周期）
    pub fn run_fixed_step(&mut self, plant: &mut SimPlant, iterations: usize, rate: f64) -> Result<()> {
        let dt = Duration::from_secs_f64(1.0 / rate);
        let mut now = Duration::ZERO;
        for _ in 0..=iterations {
            self.tick(plant, now)?;
            now += dt;
        }
        Ok(())
    }

    fn record(&mut self, report: &TickReport) {
        let elapsed = report.context.elapsed;
        self.summary.applied_ticks += 1;
        self.summary.final_error = Some(report.tracking_error());
        self.summary.elapsed = elapsed;

        if self.verbose && elapsed >= self.next_print {
            let output = report.context.kinematics.output.translation();
            println!(
                "{:>7.3}  ({:>6.3}, {:>6.3})  ({:>6.3}, {:>6.3})  {:>8.4}  {:>9.4}  {:>9.4}",
                elapsed,
                report.target.x,
                report.target.y,
                output.x,
                output.y,
                report.tracking_error(),
                report.torques[Joint::Shoulder].0,
                report.torques[Joint::Elbow].0,
            );
            self.next_print = elapsed.floor() + 1.0;
        }
    }
}

impl Controller<SimPlant> for Simulation {
    type Output = TickOutcome;
    type Error = ControlError;

    fn tick(&mut self, plant: &mut SimPlant, now: Duration) -> Result<TickOutcome, ControlError> {
        if let Some(last) = self.last {
            if now > last {
                plant.step(now - last);
            }
        }
        let outcome = self.cycle.tick(plant, now)?;
        self.last = Some(now);

        match &outcome {
            TickOutcome::Applied(report) => self.record(report),
            TickOutcome::Held { .. } => self.summary.held_ticks += 1,
            TickOutcome::Setup => {},
        }
        Ok(outcome)
    }

    fn on_time_jump(&mut self, real_dt: Duration) -> Result<(), ControlError> {
        Controller::<SimPlant>::on_time_jump(&mut self.cycle, real_dt)
    }

    fn reset(&mut self, plant: &mut SimPlant) -> Result<(), ControlError> {
        self.cycle.reset(plant);
        self.last = None;
        self.next_print = 0.0;
        self.summary = SimSummary::default();
        Ok(())
    }
}
