//! # MockBot Macros
//!
//! 这个 crate 提供了接口模拟和构造注入的过程宏，生成的代码通过 `mockbot` crate 的路径引用运行时类型。
//!
//! ## 核心宏
//!
//! - [`mockable`] - 为接口生成代理，使其可以被自动模拟
//! - [`Injectable`](derive@Injectable) - 为结构体生成构造注入
//!
//! ## 使用示例
//!
//! ```ignore
//! use mockbot::{mockable, Injectable};
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
//!     #[inject(default)]
//!     calls: usize,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod mockable;
mod utils;

/// 可模拟接口宏
///
/// 为 trait 生成一个把所有方法转发给拦截器的代理结构体，并为 `dyn Trait` 实现
/// `Service` 和 `Mockable`。缺少的 `Send + Sync` 父 trait 会被自动补上。
///
/// 方法的返回类型必须实现 `Default + 'static`，未设置的方法在宽松模式下返回默认值。
///
/// # 参数
///
/// - `kind = "interface"` - 接口形态（默认）
/// - `kind = "abstract"` - 抽象类型形态
///
/// # 示例
///
/// ```ignore
/// #[mockable]
/// pub trait Clock {
///     fn now(&self) -> u64;
/// }
/// ```
#[proc_macro_attribute]
pub fn mockable(args: TokenStream, input: TokenStream) -> TokenStream {
    mockable::mockable_impl(args, input)
}

/// 构造注入派生宏
///
/// 字段按类型解析：
///
/// - `Arc<T>` - 必需依赖，解析失败时整个构造失败
/// - `Option<Arc<T>>` - 可选依赖，解析失败时为 `None`
/// - `#[inject(default)]` 标注的字段 - 使用 `Default::default()`
///
/// # 示例
///
/// ```ignore
/// #[derive(Injectable)]
/// pub struct Scheduler {
///     clock: Arc<dyn Clock>,
///     audit: Option<Arc<dyn Audit>>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
}
