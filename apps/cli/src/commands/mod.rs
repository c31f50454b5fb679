//! 命令定义和实现

pub mod config;
pub mod simulate;
pub mod target;

pub use config::ConfigCommand;
pub use simulate::SimulateCommand;
pub use target::TargetCommand;

use clap::ValueEnum;
use twinlink_sdk::ArmSide;

/// 命令行中的机械臂朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for ArmSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Left => ArmSide::Left,
            SideArg::Right => ArmSide::Right,
        }
    }
}
