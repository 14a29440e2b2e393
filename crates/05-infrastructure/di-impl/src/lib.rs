//! # 依赖注入具体实现
//!
//! 提供依赖注入容器、绑定配置语法和内置的实例提供者

pub mod binding_syntax;
pub mod container;
pub mod providers;

pub use binding_syntax::{BindingOptions, BindingSyntax};
pub use container::{Container, TeardownHook};
pub use providers::{ConstantProvider, MethodProvider, StandardProvider};
