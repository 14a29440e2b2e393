//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务描述、绑定、解析和调用拦截的核心接口。
//!
//! ## 核心接口
//!
//! - [`Service`] / [`TypeDescriptor`] - 可解析类型及其静态描述
//! - [`Injectable`] - 构造注入
//! - [`Provider`] / [`Binding`] - 解析策略与绑定
//! - [`MissingBindingHandler`] - 解析未命中时的回调
//! - [`Resolver`] / [`ResolveContext`] - 递归解析
//! - [`Interceptor`] / [`Mockable`] - 接口代理与调用拦截

pub mod container;
pub mod factory;
pub mod interception;
pub mod registry;
pub mod resolver;
pub mod service;

pub use container::*;
pub use factory::*;
pub use interception::*;
pub use registry::*;
pub use resolver::*;
pub use service::*;
