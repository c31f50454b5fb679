//! 配置管理命令
//!
//! 导出默认配置、检查配置文件。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use twinlink_sdk::prelude::*;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 输出默认配置
    Default {
        /// 写入文件（缺省输出到标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 检查配置文件
    Check {
        /// 配置文件路径
        path: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Default { output } => Self::default_(output.as_deref()),
            ConfigCommand::Check { path } => Self::check_(&path),
        }
    }

    fn default_(output: Option<&Path>) -> Result<()> {
        let config = ArmConfig::default();
        match output {
            Some(path) => {
                config
                    .save_to_file(path)
                    .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
                println!("✅ 已写入默认配置: {}", path.display());
            },
            None => print!("{}", config.to_toml_string()?),
        }
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let config = ArmConfig::load_from_file(path)
            .with_context(|| format!("配置无效: {}", path.display()))?;

        println!("✅ 配置有效: {}", path.display());
        println!("  朝向: {}", config.side);
        println!("  连杆长度: {:.3} m", config.link_length);
        println!(
            "  关节: {} / {} / {} (传感), 基座: {}",
            config.joints.shoulder, config.joints.elbow, config.joints.sensor, config.joints.base_link
        );
        println!("  速度限幅: {:.2} rad/s", config.mapper.velocity_limit);
        match config.mapper.residual_gate {
            ResidualGate::Disabled => println!("  残差门限: 关闭"),
            ResidualGate::ZeroAbove { threshold } => println!("  残差门限: > {:e} 时清零", threshold),
        }
        Ok(())
    }
}
