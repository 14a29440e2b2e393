//! 服务描述
//!
//! Rust 没有运行时反射，每个可解析类型通过 [`Service::descriptor`] 提供自己的静态描述：
//! 形态、构造激活函数以及（接口的）代理工厂。

use crate::factory::{Activator, Instance};
use crate::interception::ProxyFactory;
use crate::resolver::ResolveContext;
use mockbot_common::{DependencyError, TypeInfo, TypeShape};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// 可解析服务 trait
///
/// 为 `dyn Trait` 接口和具体结构体实现，通常由 `#[mockable]` 和
/// `#[derive(Injectable)]` 生成。
pub trait Service: Send + Sync + 'static {
    /// 类型描述
    fn descriptor() -> TypeDescriptor;
}

/// 类型描述
#[derive(Clone)]
pub struct TypeDescriptor {
    /// 类型信息
    pub info: TypeInfo,
    /// 类型形态
    pub shape: TypeShape,
    /// 构造激活函数（仅具体类型）
    pub activator: Option<Activator>,
    /// 代理工厂（仅可模拟的接口）
    pub proxy: Option<ProxyFactory>,
}

impl TypeDescriptor {
    /// 创建类型描述
    pub fn of<T: ?Sized + 'static>(shape: TypeShape) -> Self {
        Self {
            info: TypeInfo::of::<T>(),
            shape,
            activator: None,
            proxy: None,
        }
    }

    /// 设置构造激活函数
    pub fn with_activator(mut self, activator: Activator) -> Self {
        self.activator = Some(activator);
        self
    }

    /// 设置代理工厂
    pub fn with_proxy(mut self, proxy: ProxyFactory) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn type_id(&self) -> TypeId {
        self.info.id
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("info", &self.info)
            .field("shape", &self.shape)
            .field("activatable", &self.activator.is_some())
            .field("proxyable", &self.proxy.is_some())
            .finish()
    }
}

/// 可注入组件 trait
///
/// 构造注入：依赖通过解析上下文递归解析
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 使用解析上下文构建组件实例
    fn inject(ctx: &mut ResolveContext<'_>) -> Result<Self, DependencyError>;
}

/// 通过 [`Injectable`] 激活组件，可作为 [`Activator`] 使用
pub fn activate<T: Injectable>(ctx: &mut ResolveContext<'_>) -> Result<Instance, DependencyError> {
    let component = T::inject(ctx)?;
    Ok(Instance::new(Arc::new(component)))
}

/// 实现关系 trait
///
/// 类型到类型的绑定（`bind::<dyn I>().to::<Impl>()`）依赖它完成向上转换
pub trait Implements<I: ?Sized>: Send + Sync + 'static {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

/// 声明具体类型实现的接口
///
/// ```ignore
/// implements!(ServiceA => dyn IServiceA);
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty => $($iface:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$iface> for $ty {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$iface> {
                    self
                }
            }
        )+
    };
}

macro_rules! value_services {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Service for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::of::<$ty>(TypeShape::value())
                }
            }
        )*
    };
}

value_services!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Service for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<String>(TypeShape::text())
    }
}
