//! 绑定与解析未命中回调

use crate::factory::{Provider, ProviderKind};
use crate::service::TypeDescriptor;
use mockbot_common::{Lifetime, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 绑定信息
///
/// 把一个服务类型关联到解析策略和生命周期
#[derive(Clone)]
pub struct Binding {
    /// 服务类型
    pub service: TypeInfo,
    /// 解析策略
    pub provider: Arc<dyn Provider>,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 是否为解析未命中时自动安装的隐式绑定
    pub is_implicit: bool,
}

impl Binding {
    /// 创建显式的瞬时绑定
    pub fn new(service: TypeInfo, provider: Arc<dyn Provider>) -> Self {
        Self {
            service,
            provider,
            lifetime: Lifetime::Transient,
            is_implicit: false,
        }
    }

    /// 标记为隐式绑定
    pub fn implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }

    /// 解析策略类别
    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("service", &self.service.name)
            .field("provider", &self.provider.kind())
            .field("lifetime", &self.lifetime)
            .field("is_implicit", &self.is_implicit)
            .finish()
    }
}

/// 解析未命中回调
///
/// 容器找不到显式绑定时调用；返回的绑定会被安装到绑定表中供后续请求复用，
/// 返回 `None` 表示放弃，容器随即报告未注册错误。
pub trait MissingBindingHandler: Send + Sync {
    fn handle_missing_binding(&self, descriptor: &TypeDescriptor) -> Option<Binding>;
}
