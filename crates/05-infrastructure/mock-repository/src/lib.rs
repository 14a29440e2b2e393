//! # Mock Repository
//!
//! 模拟对象工厂：为可模拟接口创建代理对象，记录调用、应用设置并在结束时统一验证。
//!
//! - [`MockRepository`] - 创建并跟踪所有模拟对象，聚合验证
//! - [`Mock`] - 单个模拟对象的句柄，用于设置期望
//! - [`SetupBuilder`] - 方法设置（返回值、回调、可验证标记）
//! - [`MockInterceptor`] - 代理对象背后的调用拦截器

pub mod behavior;
pub mod interceptor;
pub mod mock;
pub mod repository;
pub mod setup;

pub use behavior::MockBehavior;
pub use interceptor::MockInterceptor;
pub use mock::Mock;
pub use repository::MockRepository;
pub use setup::{Setup, SetupBuilder};
