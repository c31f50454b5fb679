//! # twinlink CLI
//!
//! 两关节机械臂控制律的命令行工具，内置一个简单的刚体仿真对象，无需外部仿真器。
//!
//! ```bash
//! # 查看某一时刻的目标点
//! twinlink-cli target --time 12.5 --side left
//!
//! # 闭环仿真 20 秒
//! twinlink-cli simulate --duration 20 --side right
//!
//! # 导出 / 检查配置
//! twinlink-cli config default --output arm.toml
//! twinlink-cli config check arm.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod plant;

use commands::{ConfigCommand, SimulateCommand, TargetCommand};

/// twinlink CLI - 两关节机械臂控制律工具
#[derive(Parser, Debug)]
#[command(name = "twinlink-cli")]
#[command(about = "Command-line interface for the twinlink manipulator control law", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 计算某一时刻的末端目标点
    Target {
        #[command(flatten)]
        args: TargetCommand,
    },

    /// 在内置仿真对象上运行闭环控制
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("twinlink_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(),
        Commands::Target { args } => args.execute(),
        Commands::Simulate { args } => args.execute(),
    }
}
