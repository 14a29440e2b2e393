//! 模拟对象严格程度

use serde::{Deserialize, Serialize};
use std::fmt;

/// 模拟行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockBehavior {
    /// 严格模式 - 调用未设置的方法立即失败
    Strict,
    /// 宽松模式 - 未设置的方法返回默认值
    #[default]
    Loose,
}

impl MockBehavior {
    pub const fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl fmt::Display for MockBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Loose => f.write_str("loose"),
        }
    }
}
