//! 基础类型：单位、关节索引、错误

mod error;
mod joint;
mod units;

pub use error::{ConfigError, ControlError, Result};
pub use joint::{Joint, JointArray};
pub use units::{NewtonMeter, Rad, RadPerSec};
