//! 显式绑定配置语法
//!
//! ```ignore
//! container.bind::<dyn IServiceA>().to::<ServiceA>().in_singleton_scope();
//! container.bind::<dyn IServiceB>().to_method(|ctx| Ok(Arc::new(ServiceB::new(ctx.get()?))));
//! ```

use crate::container::Container;
use crate::providers::{ConstantProvider, MethodProvider, StandardProvider};
use di_abstractions::{
    activate, Binding, Implements, Injectable, Instance, Provider, ResolveContext, Service,
    TypeDescriptor,
};
use mockbot_common::{DependencyError, Lifetime, TypeInfo, TypeShape};
use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

/// 服务 `T` 的绑定语法
#[must_use = "绑定语法需要调用 to/to_self/to_method/to_constant 才会生效"]
pub struct BindingSyntax<'c, T: ?Sized> {
    container: &'c Container,
    _service: PhantomData<fn() -> Arc<T>>,
}

impl<'c, T> BindingSyntax<'c, T>
where
    T: Service + ?Sized,
{
    pub(crate) fn new(container: &'c Container) -> Self {
        Self {
            container,
            _service: PhantomData,
        }
    }

    /// 绑定到实现类型，实现类型通过构造注入激活
    pub fn to<U>(self) -> BindingOptions<'c>
    where
        U: Injectable + Implements<T>,
    {
        let descriptor =
            TypeDescriptor::of::<U>(TypeShape::concrete()).with_activator(activate_as::<T, U>);
        self.install(Arc::new(StandardProvider::new(descriptor)))
    }

    /// 绑定到自身
    pub fn to_self(self) -> BindingOptions<'c>
    where
        T: Injectable,
    {
        let descriptor = T::descriptor().with_activator(activate::<T>);
        self.install(Arc::new(StandardProvider::new(descriptor)))
    }

    /// 绑定到工厂回调
    pub fn to_method<F>(self, factory: F) -> BindingOptions<'c>
    where
        F: Fn(&mut ResolveContext<'_>) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        let provider = MethodProvider::new(move |ctx| factory(ctx).map(Instance::new));
        self.install(Arc::new(provider))
    }

    /// 绑定到常量实例
    pub fn to_constant(self, value: Arc<T>) -> BindingOptions<'c> {
        self.install(Arc::new(ConstantProvider::new(Instance::new(value))))
    }

    fn install(self, provider: Arc<dyn Provider>) -> BindingOptions<'c> {
        let service = TypeInfo::of::<T>();
        let id = service.id;
        self.container.add_binding(Binding::new(service, provider));
        BindingOptions {
            container: self.container,
            service: id,
        }
    }
}

/// 绑定完成后的生命周期选项
pub struct BindingOptions<'c> {
    container: &'c Container,
    service: TypeId,
}

impl BindingOptions<'_> {
    /// 首次解析后缓存实例
    pub fn in_singleton_scope(self) -> Self {
        self.container.set_lifetime(self.service, Lifetime::Singleton);
        self
    }

    /// 每次解析都调用提供者（默认）
    pub fn in_transient_scope(self) -> Self {
        self.container.set_lifetime(self.service, Lifetime::Transient);
        self
    }
}

fn activate_as<I, U>(ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError>
where
    I: Service + ?Sized,
    U: Injectable + Implements<I>,
{
    let component = Arc::new(U::inject(ctx)?);
    Ok(Instance::new(<U as Implements<I>>::upcast(component)))
}
