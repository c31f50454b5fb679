//! 目标点查询命令

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Args, ValueEnum};
use serde::Serialize;
use twinlink_sdk::prelude::*;

use super::SideArg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// 目标点查询命令参数
#[derive(Args, Debug)]
pub struct TargetCommand {
    /// 自安装步骤以来的时间（秒）
    #[arg(short, long)]
    pub time: f64,

    /// 机械臂朝向
    #[arg(short, long, value_enum, default_value_t = SideArg::Right)]
    pub side: SideArg,

    /// 配置文件（使用其中的规划参数）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct TargetRow {
    side: ArmSide,
    time: f64,
    x: f64,
    y: f64,
    orbiting: bool,
}

impl TargetCommand {
    pub fn execute(&self) -> Result<()> {
        let row = self.compute()?;
        match self.format {
            OutputFormat::Table => {
                println!("🎯 目标点 (side={}, t={:.3} s):", row.side, row.time);
                println!("  x = {:.4} m", row.x);
                println!("  y = {:.4} m", row.y);
                if row.orbiting {
                    println!("  (轨道运动中)");
                }
            },
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&row)?);
            },
        }
        Ok(())
    }

    fn compute(&self) -> Result<TargetRow> {
        ensure!(
            self.time.is_finite() && self.time >= 0.0,
            "时间必须是非负有限值: {}",
            self.time
        );

        let planner_config = match &self.config {
            Some(path) => {
                ArmConfig::load_from_file(path)
                    .with_context(|| format!("加载配置失败: {}", path.display()))?
                    .planner
            },
            None => PlannerConfig::default(),
        };

        let side = ArmSide::from(self.side);
        let orbiting = self.time > planner_config.orbit_start;
        let target = TargetPlanner::new(planner_config).target(self.time, side);

        Ok(TargetRow {
            side,
            time: self.time,
            x: target.x,
            y: target.y,
            orbiting,
        })
    }
}
