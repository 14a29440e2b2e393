//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("类型无法通过构造注入激活: {type_name}")]
    NotActivatable { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("模拟对象创建失败: {type_name}, 原因: {source}")]
    MockCreationFailed {
        type_name: String,
        #[source]
        source: MockError,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {type_name}")]
    MaxDepthExceeded { type_name: String, max_depth: usize },

    #[error("类型转换失败: 期望 {expected}")]
    TypeMismatch { expected: String },

    #[error("容器已释放，无法解析: {type_name}")]
    ContainerDisposed { type_name: String },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 该类型根本无法提供（未注册、不可激活或不可模拟）
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotRegistered { .. }
                | Self::NotActivatable { .. }
                | Self::MockCreationFailed {
                    source: MockError::Unmockable { .. },
                    ..
                }
        )
    }
}

/// 未满足的可验证期望
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnmetExpectation {
    /// 接口名称
    pub interface: String,
    /// 方法名称
    pub method: String,
}

impl UnmetExpectation {
    pub fn new(interface: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for UnmetExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.interface, self.method)
    }
}

/// 模拟框架错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("严格模式下调用了未设置的方法: {interface}::{method}")]
    UnexpectedCall { interface: String, method: String },

    #[error("类型无法模拟: {type_name} ({reason})")]
    Unmockable { type_name: String, reason: String },

    #[error("设置的返回值类型不匹配: {interface}::{method}, 期望 {expected}")]
    ReturnTypeMismatch {
        interface: String,
        method: String,
        expected: String,
    },

    #[error("模拟对象验证失败，以下期望未被满足: {}", describe_unmet(.failures))]
    VerificationFailed { failures: Vec<UnmetExpectation> },
}

impl MockError {
    /// 获取未满足的期望列表（仅验证失败时非空）
    pub fn unmet_expectations(&self) -> &[UnmetExpectation] {
        match self {
            Self::VerificationFailed { failures } => failures,
            _ => &[],
        }
    }
}

fn describe_unmet(failures: &[UnmetExpectation]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 生命周期管理错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("容器释放失败: {message}")]
    TeardownFailed { message: String },
}

/// 内核释放错误
///
/// 验证失败与容器释放失败可能同时发生，两者都会被保留。
#[derive(Error, Debug)]
#[error("{}", describe_dispose(.verification, .teardown))]
pub struct DisposeError {
    /// 释放前验证的失败
    pub verification: Option<MockError>,
    /// 容器释放的失败
    pub teardown: Option<LifecycleError>,
}

impl DisposeError {
    /// 验证是否失败
    pub fn has_verification_failure(&self) -> bool {
        self.verification.is_some()
    }

    /// 容器释放是否失败
    pub fn has_teardown_failure(&self) -> bool {
        self.teardown.is_some()
    }
}

fn describe_dispose(verification: &Option<MockError>, teardown: &Option<LifecycleError>) -> String {
    match (verification, teardown) {
        (Some(v), Some(t)) => format!("内核释放失败: {v}; 同时 {t}"),
        (Some(v), None) => format!("内核释放失败: {v}"),
        (None, Some(t)) => format!("内核释放失败: {t}"),
        (None, None) => "内核释放失败".to_string(),
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置加载失败: {source}")]
    LoadError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("日志初始化失败: {message}")]
    LoggingInitFailed { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type MockResult<T> = Result<T, MockError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
