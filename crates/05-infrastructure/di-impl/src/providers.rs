//! 内置实例提供者

use di_abstractions::{Instance, Provider, ProviderKind, ResolveContext, TypeDescriptor};
use mockbot_common::DependencyError;

/// 常量提供者，总是返回同一个实例
pub struct ConstantProvider {
    instance: Instance,
}

impl ConstantProvider {
    pub fn new(instance: Instance) -> Self {
        Self { instance }
    }
}

impl Provider for ConstantProvider {
    fn create(&self, _ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError> {
        Ok(self.instance.clone())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Constant
    }
}

type Factory = dyn Fn(&mut ResolveContext<'_>) -> Result<Instance, DependencyError> + Send + Sync;

/// 工厂回调提供者
///
/// 回调拿到解析上下文，可以继续解析其他依赖
pub struct MethodProvider {
    factory: Box<Factory>,
}

impl MethodProvider {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&mut ResolveContext<'_>) -> Result<Instance, DependencyError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }
}

impl Provider for MethodProvider {
    fn create(&self, ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError> {
        (self.factory)(ctx)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Method
    }
}

/// 标准提供者，通过类型描述中的激活函数进行构造注入
pub struct StandardProvider {
    descriptor: TypeDescriptor,
}

impl StandardProvider {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

impl Provider for StandardProvider {
    fn create(&self, ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError> {
        let activator = self
            .descriptor
            .activator
            .ok_or_else(|| DependencyError::NotActivatable {
                type_name: self.descriptor.name().to_string(),
            })?;
        activator(ctx)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Activation
    }
}
