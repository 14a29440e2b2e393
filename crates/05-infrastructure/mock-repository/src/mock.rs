//! 模拟对象句柄

use crate::behavior::MockBehavior;
use crate::interceptor::MockInterceptor;
use crate::setup::SetupBuilder;
use di_abstractions::Mockable;
use mockbot_common::{MockError, TypeInfo};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// 模拟对象句柄
///
/// 持有代理对象和它背后的拦截器；克隆句柄共享同一个模拟对象。
pub struct Mock<T: ?Sized> {
    interceptor: Arc<MockInterceptor>,
    object: Arc<T>,
}

impl<T: Mockable + ?Sized> Mock<T> {
    pub(crate) fn new(behavior: MockBehavior) -> Self {
        let interceptor = Arc::new(MockInterceptor::new(TypeInfo::of::<T>(), behavior));
        let object = T::proxy(interceptor.clone());
        Self {
            interceptor,
            object,
        }
    }

    pub(crate) fn from_parts(interceptor: Arc<MockInterceptor>, object: Arc<T>) -> Self {
        Self {
            interceptor,
            object,
        }
    }

    /// 设置方法行为
    pub fn setup(&self, method: &'static str) -> SetupBuilder {
        if !T::METHODS.contains(&method) {
            warn!(
                "接口 {} 没有方法 {}，该设置永远不会被命中",
                self.interceptor.interface().name,
                method
            );
        }
        SetupBuilder::new(self.interceptor.add_setup(method))
    }
}

impl<T: ?Sized> Mock<T> {
    /// 代理对象
    pub fn object(&self) -> Arc<T> {
        self.object.clone()
    }

    pub fn behavior(&self) -> MockBehavior {
        self.interceptor.behavior()
    }

    /// 方法被调用的次数
    pub fn invocations(&self, method: &str) -> usize {
        self.interceptor.invocations(method)
    }

    pub fn interceptor(&self) -> &Arc<MockInterceptor> {
        &self.interceptor
    }

    /// 验证所有可验证的设置都至少被调用过一次
    pub fn verify(&self) -> Result<(), MockError> {
        into_result(self.interceptor.unmet_expectations(false))
    }

    /// 验证所有设置都至少被调用过一次
    pub fn verify_all(&self) -> Result<(), MockError> {
        into_result(self.interceptor.unmet_expectations(true))
    }
}

impl<T: ?Sized> Clone for Mock<T> {
    fn clone(&self) -> Self {
        Self {
            interceptor: self.interceptor.clone(),
            object: self.object.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Mock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("interface", &self.interceptor.interface().name)
            .field("behavior", &self.interceptor.behavior())
            .finish_non_exhaustive()
    }
}

pub(crate) fn into_result(
    failures: Vec<mockbot_common::UnmetExpectation>,
) -> Result<(), MockError> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(MockError::VerificationFailed { failures })
    }
}
