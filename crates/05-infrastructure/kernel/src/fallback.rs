//! 解析未命中时的回退策略
//!
//! 容器找不到显式绑定时，按类型形态决定：
//! - 可自绑定的具体类型通过构造注入激活
//! - 其余类型（接口、抽象类型、值类型、字符串、开放泛型）交给模拟仓库
//!
//! 无论选择哪条路径，结果都作为隐式瞬时绑定安装，后续请求直接复用。

use crate::cache::CreationStrategyCache;
use di_abstractions::{
    Binding, Instance, MissingBindingHandler, Provider, ProviderKind, ResolveContext,
    TypeDescriptor,
};
use di_impl::StandardProvider;
use mock_repository::MockRepository;
use mockbot_common::{DependencyError, TypeKind, TypeShape};
use std::sync::Arc;
use tracing::{debug, warn};

/// 类型能否通过构造注入自绑定
pub fn is_self_bindable(shape: &TypeShape) -> bool {
    shape.kind == TypeKind::Concrete && !shape.open_generic_parameters
}

/// 回退解析器，安装为容器的解析未命中回调
pub struct FallbackResolver {
    repository: Arc<MockRepository>,
    cache: Arc<CreationStrategyCache>,
}

impl FallbackResolver {
    pub fn new(repository: Arc<MockRepository>, cache: Arc<CreationStrategyCache>) -> Self {
        Self { repository, cache }
    }
}

impl MissingBindingHandler for FallbackResolver {
    fn handle_missing_binding(&self, descriptor: &TypeDescriptor) -> Option<Binding> {
        let provider: Arc<dyn Provider> = if is_self_bindable(&descriptor.shape) {
            debug!("{} 没有绑定，使用构造注入激活", descriptor.name());
            Arc::new(StandardProvider::new(descriptor.clone()))
        } else {
            debug!("{} 没有绑定，使用模拟对象 ({})", descriptor.name(), descriptor.shape);
            Arc::new(MockProvider::new(
                descriptor.clone(),
                self.repository.clone(),
                self.cache.clone(),
            ))
        };

        Some(Binding::new(descriptor.info.clone(), provider).implicit())
    }
}

/// 模拟对象提供者
///
/// 每次请求都创建新的模拟对象
pub struct MockProvider {
    descriptor: TypeDescriptor,
    repository: Arc<MockRepository>,
    cache: Arc<CreationStrategyCache>,
}

impl MockProvider {
    pub fn new(
        descriptor: TypeDescriptor,
        repository: Arc<MockRepository>,
        cache: Arc<CreationStrategyCache>,
    ) -> Self {
        Self {
            descriptor,
            repository,
            cache,
        }
    }
}

impl Provider for MockProvider {
    fn create(&self, _ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError> {
        let creator = self.cache.get_or_derive(&self.descriptor);
        creator(&self.repository).map_err(|source| {
            warn!("无法为 {} 创建模拟对象: {}", self.descriptor.name(), source);
            DependencyError::MockCreationFailed {
                type_name: self.descriptor.name().to_string(),
                source,
            }
        })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }
}
