//! # MockBot Common
//!
//! 这个 crate 提供了 MockBot 各层共享的类型元数据、生命周期和错误定义。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] / [`TypeShape`] - 能力类型的静态描述
//! - [`Lifetime`] - 绑定的生命周期策略
//! - [`KernelState`] - 内核状态机
//! - [`DependencyError`] / [`MockError`] / [`DisposeError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 类型分类只依赖静态形态，不依赖运行时反射
//! - 协作者的错误原样向上传播，不做本地恢复

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
