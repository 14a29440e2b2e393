//! 内核配置
//!
//! 配置来源按优先级从低到高：内置默认值、配置文件（toml/json/yaml）、环境变量。
//! 环境变量使用 `MOCKBOT_` 前缀，嵌套字段用 `__` 分隔，例如
//! `MOCKBOT_BEHAVIOR=strict`、`MOCKBOT_LOGGING__LEVEL=debug`。

use crate::telemetry::LoggingConfig;
use config::{Config, Environment, File, Source};
use di_abstractions::ContainerConfig;
use mock_repository::MockBehavior;
use mockbot_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 内核配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelSettings {
    /// 默认模拟行为
    pub behavior: MockBehavior,
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 是否检测循环依赖
    pub detect_circular_dependencies: bool,
    /// 日志配置
    pub logging: LoggingConfig,
}

impl Default for KernelSettings {
    fn default() -> Self {
        let container = ContainerConfig::default();
        Self {
            behavior: MockBehavior::default(),
            max_resolution_depth: container.max_resolution_depth,
            detect_circular_dependencies: container.enable_circular_dependency_detection,
            logging: LoggingConfig::default(),
        }
    }
}

impl KernelSettings {
    /// 默认配置文件（不含扩展名）
    pub const DEFAULT_FILE: &'static str = "config/mockbot";
    /// 环境变量前缀
    pub const ENV_PREFIX: &'static str = "MOCKBOT";

    /// 从默认配置文件（可选）和环境变量加载
    pub fn load() -> ConfigResult<Self> {
        Self::build(
            File::with_name(Self::DEFAULT_FILE).required(false),
            Self::ENV_PREFIX,
        )
    }

    /// 从指定配置文件和环境变量加载，文件必须存在
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_with_prefix(path, Self::ENV_PREFIX)
    }

    /// 使用自定义环境变量前缀加载
    pub fn load_with_prefix(path: impl AsRef<Path>, prefix: &str) -> ConfigResult<Self> {
        Self::build(File::from(path.as_ref()).required(true), prefix)
    }

    fn build<S>(file: S, prefix: &str) -> ConfigResult<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::LoadError {
                    source: Box::new(e),
                }
            })?;

        let settings: Self = config.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            ConfigError::LoadError {
                source: Box::new(e),
            }
        })?;

        settings.validate()?;
        debug!("内核配置加载成功: {:?}", settings);
        Ok(settings)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 对应的容器配置
    pub fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            enable_circular_dependency_detection: self.detect_circular_dependencies,
            max_resolution_depth: self.max_resolution_depth,
        }
    }
}
