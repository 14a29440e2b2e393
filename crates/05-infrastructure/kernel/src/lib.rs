//! # MockBot
//!
//! 自动模拟的依赖注入内核。容器找不到绑定时不再报错，而是按类型形态选择回退策略：
//! 具体结构体通过构造注入激活，接口则由模拟仓库生成模拟对象。
//!
//! ## 使用示例
//!
//! ```ignore
//! use mockbot::{mockable, AutoMockKernel, Injectable};
//! use std::sync::Arc;
//!
//! #[mockable]
//! pub trait IServiceA {
//!     fn run_a(&self);
//! }
//!
//! #[derive(Injectable)]
//! pub struct Consumer {
//!     a: Arc<dyn IServiceA>,
//! }
//!
//! let kernel = AutoMockKernel::new();
//! kernel.mock::<dyn IServiceA>().setup("run_a").verifiable();
//! kernel.get::<Consumer>()?.a.run_a();
//! kernel.dispose()?;
//! ```

extern crate self as mockbot;

pub mod cache;
pub mod diagnostics;
pub mod fallback;
pub mod kernel;
pub mod settings;
pub mod telemetry;

pub use cache::{CreationStrategyCache, MockCreator};
pub use diagnostics::{BindingReport, KernelDiagnostics};
pub use fallback::{is_self_bindable, FallbackResolver, MockProvider};
pub use kernel::{AutoMockKernel, ScopeError};
pub use settings::KernelSettings;
pub use telemetry::{init_logging, LoggingConfig};

pub use di_abstractions::{
    activate, dispatch, implements, proxy_instance, Binding, ContainerConfig, Implements,
    Injectable, Instance, Interceptor, MissingBindingHandler, Mockable, Provider, ProviderKind,
    ResolveContext, Service, TypeDescriptor,
};
pub use di_impl::{BindingOptions, BindingSyntax, Container};
pub use mock_repository::{Mock, MockBehavior, MockRepository, SetupBuilder};
pub use mockbot_common::{
    ConfigError, DependencyError, DisposeError, KernelState, Lifetime, LifecycleError, MockError,
    TypeInfo, TypeKind, TypeShape, UnmetExpectation,
};
pub use mockbot_macros::{mockable, Injectable};
