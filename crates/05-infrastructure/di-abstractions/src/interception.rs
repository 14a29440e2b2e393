//! 接口代理与调用拦截
//!
//! `#[mockable]` 为接口生成的代理结构体把每次方法调用转交给 [`Interceptor`]，
//! 由拦截器决定返回值、执行回调或拒绝调用。

use crate::factory::Instance;
use crate::service::Service;
use mockbot_common::MockError;
use std::any::{type_name, Any};
use std::sync::Arc;

/// 调用拦截器 trait
pub trait Interceptor: Send + Sync {
    /// 拦截一次方法调用
    ///
    /// - `Ok(Some(value))` 使用设置好的返回值
    /// - `Ok(None)` 使用返回类型的默认值
    /// - `Err(..)` 拒绝本次调用
    fn intercept(&self, method: &'static str) -> Result<Option<Box<dyn Any + Send>>, MockError>;

    /// 被拦截的接口名称
    fn interface_name(&self) -> &str;
}

/// 代理工厂，把拦截器包装成接口实例
pub type ProxyFactory = fn(Arc<dyn Interceptor>) -> Instance;

/// 可模拟接口 trait
pub trait Mockable: Service {
    /// 接口声明的全部方法名
    const METHODS: &'static [&'static str];

    /// 创建转发到拦截器的代理对象
    fn proxy(interceptor: Arc<dyn Interceptor>) -> Arc<Self>;
}

/// 为可模拟接口创建类型擦除的代理实例，可作为 [`ProxyFactory`] 使用
pub fn proxy_instance<T>(interceptor: Arc<dyn Interceptor>) -> Instance
where
    T: Mockable + ?Sized,
{
    Instance::new(T::proxy(interceptor))
}

/// 代理方法的调用入口
///
/// 拦截器拒绝调用时以 [`MockError`] 作为负载 panic，调用方可用
/// `catch_unwind` 捕获后向下转换。
pub fn dispatch<R>(interceptor: &dyn Interceptor, method: &'static str) -> R
where
    R: Default + 'static,
{
    match interceptor.intercept(method) {
        Ok(None) => R::default(),
        Ok(Some(value)) => match value.downcast::<R>() {
            Ok(value) => *value,
            Err(_) => std::panic::panic_any(MockError::ReturnTypeMismatch {
                interface: interceptor.interface_name().to_string(),
                method: method.to_string(),
                expected: type_name::<R>().to_string(),
            }),
        },
        Err(error) => std::panic::panic_any(error),
    }
}
