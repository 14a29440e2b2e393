//! 依赖注入容器

use crate::binding_syntax::BindingSyntax;
use di_abstractions::{
    Binding, ContainerConfig, ContainerStats, Instance, MissingBindingHandler, ResolveContext,
    ResolveOptions, Resolver, Service, TypeDescriptor,
};
use mockbot_common::{DependencyError, Lifetime, LifecycleError};
use parking_lot::{Mutex, RwLock};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 容器释放时执行的清理回调
pub type TeardownHook =
    Box<dyn FnOnce() -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send>;

/// 依赖注入容器
///
/// 绑定表和单例缓存都由锁保护，但提供者运行期间不持有任何锁，
/// 因此提供者可以通过解析上下文递归解析其他服务。
pub struct Container {
    config: ContainerConfig,
    bindings: RwLock<HashMap<TypeId, Binding>>,
    singletons: RwLock<HashMap<TypeId, Instance>>,
    missing_binding_handler: Option<Arc<dyn MissingBindingHandler>>,
    teardown_hooks: Mutex<Vec<TeardownHook>>,
    resolutions: AtomicUsize,
    resolution_errors: AtomicUsize,
    disposed: AtomicBool,
}

impl Container {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            bindings: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
            missing_binding_handler: None,
            teardown_hooks: Mutex::new(Vec::new()),
            resolutions: AtomicUsize::new(0),
            resolution_errors: AtomicUsize::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    /// 设置解析未命中回调
    pub fn set_missing_binding_handler(&mut self, handler: Arc<dyn MissingBindingHandler>) {
        self.missing_binding_handler = Some(handler);
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 开始配置服务 `T` 的显式绑定
    pub fn bind<T: Service + ?Sized>(&self) -> BindingSyntax<'_, T> {
        BindingSyntax::new(self)
    }

    /// 添加绑定
    ///
    /// 覆盖该服务已有的任何绑定（隐式或显式），并丢弃已缓存的单例
    pub fn add_binding(&self, binding: Binding) {
        let id = binding.service.id;
        info!(
            "注册绑定: {} -> {} ({})",
            binding.service.name,
            binding.provider_kind(),
            binding.lifetime
        );

        let previous = self.bindings.write().insert(id, binding);
        if let Some(previous) = previous {
            debug!(
                "覆盖已有绑定: {} (隐式: {})",
                previous.service.name, previous.is_implicit
            );
        }
        self.singletons.write().remove(&id);
    }

    pub(crate) fn set_lifetime(&self, service: TypeId, lifetime: Lifetime) {
        if let Some(binding) = self.bindings.write().get_mut(&service) {
            binding.lifetime = lifetime;
        }
        self.singletons.write().remove(&service);
    }

    /// 检查服务是否已有绑定
    pub fn has_binding<T: ?Sized + 'static>(&self) -> bool {
        self.bindings.read().contains_key(&TypeId::of::<T>())
    }

    /// 获取服务的绑定
    pub fn binding_of<T: ?Sized + 'static>(&self) -> Option<Binding> {
        self.bindings.read().get(&TypeId::of::<T>()).cloned()
    }

    /// 当前所有绑定的快照
    pub fn bindings(&self) -> Vec<Binding> {
        self.bindings.read().values().cloned().collect()
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        let bindings = self.bindings.read();
        ContainerStats {
            bindings: bindings.len(),
            implicit_bindings: bindings.values().filter(|b| b.is_implicit).count(),
            active_singletons: self.singletons.read().len(),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
        }
    }

    /// 解析服务
    pub fn get<T: Service + ?Sized>(&self) -> Result<Arc<T>, DependencyError> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let mut ctx = ResolveContext::new(self, ResolveOptions::from(&self.config));
        let result = ctx.get::<T>();
        if let Err(error) = &result {
            self.resolution_errors.fetch_add(1, Ordering::Relaxed);
            warn!("解析失败: {}", error);
        }
        result
    }

    /// 注册容器释放时执行的清理回调
    pub fn on_teardown<F>(&self, hook: F)
    where
        F: FnOnce() -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
    {
        self.teardown_hooks.lock().push(Box::new(hook));
    }

    /// 是否已释放
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// 释放容器
    ///
    /// 只有第一次调用生效；清空绑定和单例后执行全部清理回调，
    /// 所有回调的失败合并为一个错误返回。
    pub fn dispose(&self) -> Result<(), LifecycleError> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.bindings.write().clear();
        self.singletons.write().clear();

        let hooks = std::mem::take(&mut *self.teardown_hooks.lock());
        let failures: Vec<String> = hooks
            .into_iter()
            .filter_map(|hook| hook().err())
            .map(|error| error.to_string())
            .collect();

        if failures.is_empty() {
            info!("容器已释放");
            Ok(())
        } else {
            warn!("容器释放时有 {} 个清理回调失败", failures.len());
            Err(LifecycleError::TeardownFailed {
                message: failures.join("; "),
            })
        }
    }

    fn find_binding(&self, descriptor: &TypeDescriptor) -> Result<Binding, DependencyError> {
        let id = descriptor.type_id();
        let existing = self.bindings.read().get(&id).cloned();
        if let Some(binding) = existing {
            return Ok(binding);
        }

        let not_registered = || DependencyError::ComponentNotRegistered {
            type_name: descriptor.name().to_string(),
        };
        let handler = self
            .missing_binding_handler
            .as_ref()
            .ok_or_else(not_registered)?;
        let binding = handler
            .handle_missing_binding(descriptor)
            .ok_or_else(not_registered)?;

        // 并发首次解析时先安装者获胜
        let installed = self
            .bindings
            .write()
            .entry(id)
            .or_insert_with(|| {
                debug!(
                    "安装隐式绑定: {} -> {}",
                    descriptor.name(),
                    binding.provider_kind()
                );
                binding
            })
            .clone();
        Ok(installed)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Container {
    fn resolve_descriptor(
        &self,
        descriptor: &TypeDescriptor,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Instance, DependencyError> {
        if self.is_disposed() {
            return Err(DependencyError::ContainerDisposed {
                type_name: descriptor.name().to_string(),
            });
        }

        let id = descriptor.type_id();
        let cached = self.singletons.read().get(&id).cloned();
        if let Some(instance) = cached {
            return Ok(instance);
        }

        let binding = self.find_binding(descriptor)?;
        let instance = binding.provider.create(ctx)?;

        if binding.lifetime == Lifetime::Singleton {
            let instance = self
                .singletons
                .write()
                .entry(id)
                .or_insert(instance)
                .clone();
            return Ok(instance);
        }
        Ok(instance)
    }
}
