//! 模拟对象仓库

use crate::behavior::MockBehavior;
use crate::interceptor::MockInterceptor;
use crate::mock::{into_result, Mock};
use di_abstractions::{Instance, Mockable, TypeDescriptor};
use mockbot_common::{MockError, TypeInfo};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct TrackedMock {
    interceptor: Arc<MockInterceptor>,
    object: Instance,
}

/// 模拟对象仓库
///
/// 由它创建的每个模拟对象都会被跟踪，[`MockRepository::verify`] 一次检查全部。
pub struct MockRepository {
    behavior: MockBehavior,
    tracked: Mutex<Vec<TrackedMock>>,
}

impl MockRepository {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// 默认的模拟行为
    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    /// 使用仓库默认行为创建模拟对象
    pub fn create<T: Mockable + ?Sized>(&self) -> Mock<T> {
        self.create_with(self.behavior)
    }

    /// 使用指定行为创建模拟对象
    pub fn create_with<T: Mockable + ?Sized>(&self, behavior: MockBehavior) -> Mock<T> {
        let mock = Mock::<T>::new(behavior);
        self.track(mock.interceptor().clone(), Instance::new(mock.object()));
        mock
    }

    /// 按类型描述创建模拟对象
    ///
    /// 描述中没有代理工厂的类型（值类型、字符串、具体结构体等）无法模拟
    pub fn create_erased(&self, descriptor: &TypeDescriptor) -> Result<Instance, MockError> {
        let proxy = descriptor.proxy.ok_or_else(|| MockError::Unmockable {
            type_name: descriptor.name().to_string(),
            reason: format!("{} 类型没有可用的代理", descriptor.shape),
        })?;

        let interceptor = Arc::new(MockInterceptor::new(descriptor.info.clone(), self.behavior));
        let object = proxy(interceptor.clone());
        self.track(interceptor, object.clone());
        Ok(object)
    }

    fn track(&self, interceptor: Arc<MockInterceptor>, object: Instance) {
        debug!(
            "创建模拟对象: {} ({})",
            interceptor.interface().name,
            interceptor.behavior()
        );
        self.tracked.lock().push(TrackedMock {
            interceptor,
            object,
        });
    }

    /// 已创建的模拟对象数量
    pub fn created(&self) -> usize {
        self.tracked.lock().len()
    }

    /// 验证所有模拟对象的可验证设置
    ///
    /// 所有未满足的期望汇总到一个错误里，不会在第一个失败处停止
    pub fn verify(&self) -> Result<(), MockError> {
        self.verify_with(false)
    }

    /// 验证所有模拟对象的全部设置
    pub fn verify_all(&self) -> Result<(), MockError> {
        self.verify_with(true)
    }

    fn verify_with(&self, all: bool) -> Result<(), MockError> {
        let interceptors: Vec<_> = self
            .tracked
            .lock()
            .iter()
            .map(|tracked| tracked.interceptor.clone())
            .collect();

        let failures: Vec<_> = interceptors
            .iter()
            .flat_map(|interceptor| interceptor.unmet_expectations(all))
            .collect();

        if failures.is_empty() {
            info!("模拟对象验证通过，共 {} 个", interceptors.len());
        } else {
            warn!("模拟对象验证失败，{} 个期望未被满足", failures.len());
        }
        into_result(failures)
    }

    /// 对象是否由本仓库创建
    pub fn is_mock<T: ?Sized + 'static>(&self, object: &Arc<T>) -> bool {
        self.find_tracked(object).is_some()
    }

    /// 找回对象对应的模拟句柄
    pub fn find<T: Mockable + ?Sized>(&self, object: &Arc<T>) -> Option<Mock<T>> {
        self.find_tracked(object)
            .map(|(interceptor, object)| Mock::from_parts(interceptor, object))
    }

    fn find_tracked<T: ?Sized + 'static>(
        &self,
        object: &Arc<T>,
    ) -> Option<(Arc<MockInterceptor>, Arc<T>)> {
        let address = Arc::as_ptr(object).cast::<()>();
        let interface = TypeInfo::of::<T>();
        self.tracked
            .lock()
            .iter()
            .filter(|tracked| tracked.interceptor.interface().id == interface.id)
            .find_map(|tracked| {
                let candidate = tracked.object.downcast::<T>()?;
                (Arc::as_ptr(&candidate).cast::<()>() == address)
                    .then(|| (tracked.interceptor.clone(), candidate))
            })
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new(MockBehavior::default())
    }
}
