//! 组件解析器抽象接口
//!
//! 提供递归依赖解析和循环依赖检测的能力

use crate::container::ContainerConfig;
use crate::factory::Instance;
use crate::service::{Service, TypeDescriptor};
use mockbot_common::{DependencyError, TypeInfo};
use std::sync::Arc;

/// 解析器 trait
///
/// 由容器实现，按类型描述产出实例
pub trait Resolver: Send + Sync {
    /// 解析指定描述的类型
    fn resolve_descriptor(
        &self,
        descriptor: &TypeDescriptor,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Instance, DependencyError>;
}

/// 解析上下文
///
/// 在一次顶层请求内贯穿所有递归解析
pub struct ResolveContext<'a> {
    resolver: &'a dyn Resolver,
    /// 当前解析链，用于检测循环依赖
    resolution_chain: Vec<TypeInfo>,
    /// 解析选项
    options: ResolveOptions,
}

impl<'a> ResolveContext<'a> {
    /// 创建新的解析上下文
    pub fn new(resolver: &'a dyn Resolver, options: ResolveOptions) -> Self {
        Self {
            resolver,
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 解析服务
    pub fn get<T>(&mut self) -> Result<Arc<T>, DependencyError>
    where
        T: Service + ?Sized,
    {
        let descriptor = T::descriptor();
        let instance = self.resolve(&descriptor)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                expected: descriptor.info.module_path.clone(),
            })
    }

    /// 解析可选服务，无法提供的类型得到 `None`，其余错误照常返回
    pub fn get_optional<T>(&mut self) -> Result<Option<Arc<T>>, DependencyError>
    where
        T: Service + ?Sized,
    {
        match self.get::<T>() {
            Ok(service) => Ok(Some(service)),
            Err(e) if e.is_unavailable() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 按描述解析，返回类型擦除的实例
    pub fn resolve(&mut self, descriptor: &TypeDescriptor) -> Result<Instance, DependencyError> {
        self.push_type(&descriptor.info)?;
        let resolver = self.resolver;
        let result = resolver.resolve_descriptor(descriptor, self);
        self.pop_type();
        result
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, info: &TypeInfo) -> Result<(), DependencyError> {
        if self.options.detect_circular_dependencies
            && self.resolution_chain.iter().any(|t| t.id == info.id)
        {
            let chain = self
                .resolution_chain
                .iter()
                .map(|t| t.name.as_str())
                .chain(std::iter::once(info.name.as_str()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
        }

        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::MaxDepthExceeded {
                type_name: info.name.clone(),
                max_depth: self.options.max_depth,
            });
        }

        self.resolution_chain.push(info.clone());
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 当前解析链
    pub fn resolution_chain(&self) -> &[TypeInfo] {
        &self.resolution_chain
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 是否检测循环依赖
    pub detect_circular_dependencies: bool,
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&ContainerConfig::default())
    }
}

impl From<&ContainerConfig> for ResolveOptions {
    fn from(config: &ContainerConfig) -> Self {
        Self {
            detect_circular_dependencies: config.enable_circular_dependency_detection,
            max_depth: config.max_resolution_depth,
        }
    }
}
