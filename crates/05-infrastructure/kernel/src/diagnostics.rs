//! 内核诊断快照

use chrono::{DateTime, Utc};
use di_abstractions::Binding;
use mock_repository::MockBehavior;
use mockbot_common::{KernelState, Lifetime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 单个绑定的诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingReport {
    /// 服务类型
    pub service: String,
    /// 解析策略
    pub provider: String,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 是否为回退解析安装的隐式绑定
    pub implicit: bool,
}

impl From<&Binding> for BindingReport {
    fn from(binding: &Binding) -> Self {
        Self {
            service: binding.service.name.clone(),
            provider: binding.provider_kind().to_string(),
            lifetime: binding.lifetime,
            implicit: binding.is_implicit,
        }
    }
}

/// 内核诊断快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelDiagnostics {
    pub kernel_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub behavior: MockBehavior,
    pub state: KernelState,
    /// 按服务名称排序的绑定
    pub bindings: Vec<BindingReport>,
    /// 已创建的模拟对象数量
    pub mocks_created: usize,
    /// 已缓存的模拟对象创建策略数量
    pub cached_strategies: usize,
    pub resolutions: usize,
    pub resolution_errors: usize,
}

impl KernelDiagnostics {
    /// 隐式绑定
    pub fn implicit_bindings(&self) -> impl Iterator<Item = &BindingReport> {
        self.bindings.iter().filter(|binding| binding.implicit)
    }

    /// 查找服务的绑定
    pub fn binding(&self, service: &str) -> Option<&BindingReport> {
        self.bindings.iter().find(|binding| binding.service == service)
    }
}
