//! 错误类型体系
//!
//! 区分安装期致命错误（名称解析失败、配置非法）与运行期错误（反馈数据异常）。
//!
//! # 示例
//!
//! ```rust
//! use twinlink_control::types::ControlError;
//!
//! fn handle_error(err: ControlError) {
//!     if err.is_fatal() {
//!         eprintln!("致命错误: {}", err);
//!         // 拒绝启动控制循环
//!     } else {
//!         eprintln!("错误: {}", err);
//!         // 跳过本周期
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 控制律错误类型
#[derive(Debug, Error)]
pub enum ControlError {
    // ==================== Fatal Errors (安装期) ====================
    /// 仿真模型中找不到指定名称的关节
    #[error("Unknown joint: {name}")]
    UnknownJoint {
        /// 关节名称
        name: String,
    },

    /// 仿真模型中找不到指定名称的连杆
    #[error("Unknown link: {name}")]
    UnknownLink {
        /// 连杆名称
        name: String,
    },

    /// 配置文件错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 参数不合法
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// 参数名称
        param: String,
        /// 错误原因
        reason: String,
    },

    // ==================== Runtime Errors ====================
    /// 反馈数据不是有限值（NaN 或 Inf）
    #[error("Non-finite feedback for {quantity}: {value}")]
    NonFiniteFeedback {
        /// 数据来源描述（如 "shoulder angle"）
        quantity: String,
        /// 实际读数
        value: f64,
    },
}

impl ControlError {
    /// 是否为致命错误（控制循环无法启动或继续）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ControlError::UnknownJoint { .. }
                | ControlError::UnknownLink { .. }
                | ControlError::Config(_)
                | ControlError::InvalidParameter { .. }
        )
    }

    /// 是否为配置类错误
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ControlError::Config(_) | ControlError::InvalidParameter { .. }
        )
    }

    pub fn unknown_joint(name: impl Into<String>) -> Self {
        ControlError::UnknownJoint { name: name.into() }
    }

    pub fn unknown_link(name: impl Into<String>) -> Self {
        ControlError::UnknownLink { name: name.into() }
    }

    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        ControlError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    pub fn non_finite(quantity: impl Into<String>, value: f64) -> Self {
        ControlError::NonFiniteFeedback {
            quantity: quantity.into(),
            value,
        }
    }
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for '{param}': {reason}")]
    Invalid { param: String, reason: String },
}

impl ConfigError {
    pub fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// 控制律 Result 类型别名
pub type Result<T> = std::result::Result<T, ControlError>;
