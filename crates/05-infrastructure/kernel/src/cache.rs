//! 模拟对象创建策略缓存

use di_abstractions::{Instance, TypeDescriptor};
use mock_repository::MockRepository;
use mockbot_common::MockError;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 针对某个类型的模拟对象创建策略
pub type MockCreator = Arc<dyn Fn(&MockRepository) -> Result<Instance, MockError> + Send + Sync>;

/// 创建策略缓存
///
/// 每个类型最多一条策略。锁只覆盖查找或插入，创建模拟对象时不持有锁。
#[derive(Default)]
pub struct CreationStrategyCache {
    strategies: Mutex<HashMap<TypeId, MockCreator>>,
}

impl CreationStrategyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取类型的创建策略，不存在时推导并缓存
    pub fn get_or_derive(&self, descriptor: &TypeDescriptor) -> MockCreator {
        self.strategies
            .lock()
            .entry(descriptor.type_id())
            .or_insert_with(|| {
                debug!("缓存模拟对象创建策略: {}", descriptor.name());
                derive(descriptor)
            })
            .clone()
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.strategies.lock().contains_key(&type_id)
    }

    /// 已缓存的策略数量
    pub fn len(&self) -> usize {
        self.strategies.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.lock().is_empty()
    }
}

fn derive(descriptor: &TypeDescriptor) -> MockCreator {
    let descriptor = descriptor.clone();
    Arc::new(move |repository: &MockRepository| repository.create_erased(&descriptor))
}
