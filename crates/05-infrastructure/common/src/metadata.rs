//! 元数据定义
//!
//! 提供能力类型（被依赖的接口或结构体）的静态描述信息

use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    ///
    /// 支持 `dyn Trait` 等非 `Sized` 类型，`dyn` 前缀和泛型参数不计入短名称。
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_name_of(full_name).to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn short_name_of(full_name: &str) -> &str {
    let base = full_name.split('<').next().unwrap_or(full_name);
    let base = base.split(" + ").next().unwrap_or(base);
    let base = base.rsplit("::").next().unwrap_or(base);
    base.trim_start_matches("dyn ").trim()
}

/// 类型类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// 接口（trait 对象）
    Interface,
    /// 抽象类型，只能通过代理或显式绑定获得实例
    Abstract,
    /// 可通过构造注入激活的具体类型
    Concrete,
    /// 值类型（数值、布尔等原始类型）
    Value,
    /// 内置文本类型
    Text,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Interface => "interface",
            Self::Abstract => "abstract",
            Self::Concrete => "concrete",
            Self::Value => "value",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// 类型形态
///
/// 能力类型一经描述即不可变，解析策略只依据这里的静态信息做决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeShape {
    /// 类型类别
    pub kind: TypeKind,
    /// 是否带有未绑定的泛型参数
    pub open_generic_parameters: bool,
}

impl TypeShape {
    /// 创建指定类别的类型形态
    pub const fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            open_generic_parameters: false,
        }
    }

    /// 接口形态
    pub const fn interface() -> Self {
        Self::new(TypeKind::Interface)
    }

    /// 抽象类型形态
    pub const fn abstract_type() -> Self {
        Self::new(TypeKind::Abstract)
    }

    /// 具体类型形态
    pub const fn concrete() -> Self {
        Self::new(TypeKind::Concrete)
    }

    /// 值类型形态
    pub const fn value() -> Self {
        Self::new(TypeKind::Value)
    }

    /// 文本类型形态
    pub const fn text() -> Self {
        Self::new(TypeKind::Text)
    }

    /// 标记为带有未绑定的泛型参数
    pub const fn with_open_generic_parameters(mut self) -> Self {
        self.open_generic_parameters = true;
        self
    }

    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    pub const fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Abstract)
    }

    pub const fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Value)
    }

    pub const fn is_text(&self) -> bool {
        matches!(self.kind, TypeKind::Text)
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open_generic_parameters {
            write!(f, "{} (open generic)", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
