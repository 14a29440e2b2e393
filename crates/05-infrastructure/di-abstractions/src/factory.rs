//! 实例提供者抽象接口
//!
//! 提供者负责为一个绑定产出实例，实例以类型擦除的形式在容器内流转

use crate::resolver::ResolveContext;
use mockbot_common::DependencyError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除的实例
///
/// 内部总是保存一个 `Arc<T>`，克隆只增加引用计数。
#[derive(Clone)]
pub struct Instance(Arc<dyn Any + Send + Sync>);

impl Instance {
    /// 包装一个共享实例
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// 还原为具体类型的共享指针
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.0.downcast_ref::<Arc<T>>().cloned()
    }

    /// 是否保存的是 `Arc<T>`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.0.is::<Arc<T>>()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Instance(..)")
    }
}

/// 构造激活函数
pub type Activator = fn(&mut ResolveContext<'_>) -> Result<Instance, DependencyError>;

/// 提供者类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// 常量实例
    Constant,
    /// 工厂回调
    Method,
    /// 构造注入激活
    Activation,
    /// 模拟对象
    Mock,
}

impl ProviderKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Method => "method",
            Self::Activation => "activation",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 实例提供者 trait
pub trait Provider: Send + Sync {
    /// 创建（或返回）实例
    fn create(&self, ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError>;

    /// 提供者类别
    fn kind(&self) -> ProviderKind;
}
