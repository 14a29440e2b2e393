//! 依赖注入容器配置与统计

/// 容器配置
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 是否启用循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            enable_circular_dependency_detection: true,
            max_resolution_depth: 100,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 当前绑定数量
    pub bindings: usize,
    /// 其中隐式绑定数量
    pub implicit_bindings: usize,
    /// 已缓存的单例数量
    pub active_singletons: usize,
    /// 顶层解析次数
    pub resolutions: usize,
    /// 解析错误次数
    pub resolution_errors: usize,
}
