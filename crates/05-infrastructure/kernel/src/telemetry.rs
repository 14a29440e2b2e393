//! 日志初始化

use mockbot_common::{ConfigError, ConfigResult};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

static LOGGING: OnceCell<()> = OnceCell::new();

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或过滤指令，`RUST_LOG` 优先
    pub level: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
    /// 是否输出到测试框架捕获的标准输出
    pub test_writer: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
            test_writer: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
            test_writer: false,
        }
    }

    /// 创建测试环境日志配置
    pub fn test() -> Self {
        Self {
            level: "debug".to_string(),
            test_writer: true,
            ..Self::default()
        }
    }
}

/// 初始化全局日志订阅者
///
/// 进程内只会安装一次，之后的调用直接返回成功
pub fn init_logging(config: &LoggingConfig) -> ConfigResult<()> {
    LOGGING.get_or_try_init(|| install(config)).map(|_| ())
}

fn install(config: &LoggingConfig) -> ConfigResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ConfigError::LoggingInitFailed {
            message: format!("无效的日志级别 {}: {}", config.level, e),
        })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    match (config.json_format, config.test_writer) {
        (true, true) => subscriber.json().with_test_writer().try_init(),
        (true, false) => subscriber.json().try_init(),
        (false, true) => subscriber.with_test_writer().try_init(),
        (false, false) => subscriber.try_init(),
    }
    .map_err(|e| ConfigError::LoggingInitFailed {
        message: e.to_string(),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
