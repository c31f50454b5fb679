//! # 机械臂配置
//!
//! 从 TOML 文件加载，所有字段都有默认值，配置文件只需写出要覆盖的部分：
//!
//! ```toml
//! side = "left"
//! link_length = 0.8
//!
//! [joints]
//! shoulder = "joint0"
//! elbow = "joint1"
//! sensor = "joint2"
//! base_link = "link_0"
//!
//! [mapper]
//! velocity_limit = 3.0
//! residual_gate = { mode = "zero_above", threshold = 0.001 }
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::force::CompensatorConfig;
use crate::mapper::MapperConfig;
use crate::planner::PlannerConfig;
use crate::regulator::RegulatorConfig;
use crate::types::{ConfigError, JointArray, Rad};

/// 机械臂朝向
///
/// 左臂为镜像臂：目标横向偏移取负，初始构型关于竖直轴对称。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArmSide {
    Left,
    #[default]
    Right,
}

impl ArmSide {
    #[inline]
    pub fn is_mirrored(self) -> bool {
        matches!(self, ArmSide::Left)
    }

    /// 复位时的初始关节构型
    ///
    /// 左臂：肩 -π/4，肘 +π/2；右臂取镜像。
    pub fn home_angles(self) -> JointArray<Rad> {
        let sign = if self.is_mirrored() { 1.0 } else { -1.0 };
        JointArray::new([Rad(-sign * FRAC_PI_4), Rad(sign * FRAC_PI_2)])
    }
}

impl std::fmt::Display for ArmSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArmSide::Left => write!(f, "left"),
            ArmSide::Right => write!(f, "right"),
        }
    }
}

/// 仿真模型中的关节/连杆名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointNames {
    pub shoulder: String,
    pub elbow: String,
    /// 末端力传感关节
    pub sensor: String,
    /// 基座连杆（其质心位置作为肩关节位置）
    pub base_link: String,
}

impl Default for JointNames {
    fn default() -> Self {
        Self {
            shoulder: "joint0".to_string(),
            elbow: "joint1".to_string(),
            sensor: "joint2".to_string(),
            base_link: "link_0".to_string(),
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    pub side: ArmSide,
    /// 连杆长度（m），两根连杆等长
    pub link_length: f64,
    pub joints: JointNames,
    pub planner: PlannerConfig,
    pub force: CompensatorConfig,
    pub mapper: MapperConfig,
    pub regulator: RegulatorConfig,
}

impl ArmConfig {
    pub fn for_side(side: ArmSide) -> Self {
        Self {
            side,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ArmConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 检查所有参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.link_length.is_finite() && self.link_length >= 0.0) {
            return Err(ConfigError::invalid(
                "link_length",
                format!("must be finite and >= 0, got {}", self.link_length),
            ));
        }
        let names = [
            ("joints.shoulder", &self.joints.shoulder),
            ("joints.elbow", &self.joints.elbow),
            ("joints.sensor", &self.joints.sensor),
            ("joints.base_link", &self.joints.base_link),
        ];
        for (param, name) in names {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid(param, "name must not be empty"));
            }
        }
        self.planner.validate()?;
        self.force.validate()?;
        self.mapper.validate()?;
        self.regulator.validate()?;
        Ok(())
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            side: ArmSide::default(),
            link_length: crate::kinematics::KinematicModel::DEFAULT_LINK_LENGTH,
            joints: JointNames::default(),
            planner: PlannerConfig::default(),
            force: CompensatorConfig::default(),
            mapper: MapperConfig::default(),
            regulator: RegulatorConfig::default(),
        }
    }
}
