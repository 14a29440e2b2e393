//! 绑定生命周期与内核状态

use serde::{Deserialize, Serialize};
use std::fmt;

/// 绑定生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 首次解析后缓存实例
    Singleton,
    /// 瞬时模式 - 每次请求都调用提供者，隐式绑定总是使用此模式
    #[default]
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => f.write_str("singleton"),
            Self::Transient => f.write_str("transient"),
        }
    }
}

/// 内核生命周期状态
///
/// `Constructed → Resolving（可重入） → Disposed`，释放后不允许任何操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelState {
    /// 已创建
    #[default]
    Constructed,
    /// 正在解析
    Resolving,
    /// 已释放
    Disposed,
}

impl KernelState {
    /// 是否还能继续使用
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Disposed)
    }
}

impl fmt::Display for KernelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructed => f.write_str("constructed"),
            Self::Resolving => f.write_str("resolving"),
            Self::Disposed => f.write_str("disposed"),
        }
    }
}
