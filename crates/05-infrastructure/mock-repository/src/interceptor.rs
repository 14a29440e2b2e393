//! 模拟对象调用拦截器

use crate::behavior::MockBehavior;
use crate::setup::Setup;
use di_abstractions::Interceptor;
use mockbot_common::{MockError, TypeInfo, UnmetExpectation};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use tracing::{trace, warn};

/// 模拟对象的调用拦截器
///
/// 记录每一次调用；同一方法只保留最新的设置。
pub struct MockInterceptor {
    interface: TypeInfo,
    behavior: MockBehavior,
    setups: Mutex<Vec<Arc<Setup>>>,
    invocations: Mutex<Vec<&'static str>>,
}

impl MockInterceptor {
    pub fn new(interface: TypeInfo, behavior: MockBehavior) -> Self {
        Self {
            interface,
            behavior,
            setups: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn interface(&self) -> &TypeInfo {
        &self.interface
    }

    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    /// 为方法添加设置，替换该方法原有的设置
    pub(crate) fn add_setup(&self, method: &'static str) -> Arc<Setup> {
        let setup = Arc::new(Setup::new(method));
        let mut setups = self.setups.lock();
        setups.retain(|existing| existing.method() != method);
        setups.push(setup.clone());
        setup
    }

    /// 方法被调用的次数（无论是否有设置）
    pub fn invocations(&self, method: &str) -> usize {
        self.invocations
            .lock()
            .iter()
            .filter(|invoked| **invoked == method)
            .count()
    }

    /// 全部调用记录，按调用顺序
    pub fn invocation_log(&self) -> Vec<&'static str> {
        self.invocations.lock().clone()
    }

    /// 未满足的期望
    ///
    /// `all` 为 `false` 时只检查可验证的设置，为 `true` 时检查全部设置
    pub fn unmet_expectations(&self, all: bool) -> Vec<UnmetExpectation> {
        self.setups
            .lock()
            .iter()
            .filter(|setup| all || setup.is_verifiable())
            .filter(|setup| setup.calls() == 0)
            .map(|setup| UnmetExpectation::new(self.interface.name.clone(), setup.method()))
            .collect()
    }
}

impl Interceptor for MockInterceptor {
    fn intercept(&self, method: &'static str) -> Result<Option<Box<dyn Any + Send>>, MockError> {
        trace!("拦截调用: {}::{}", self.interface.name, method);
        self.invocations.lock().push(method);

        let setup = self
            .setups
            .lock()
            .iter()
            .find(|setup| setup.method() == method)
            .cloned();

        match setup {
            Some(setup) => Ok(setup.invoke()),
            None if self.behavior.is_strict() => {
                warn!("严格模式下调用了未设置的方法: {}::{}", self.interface.name, method);
                Err(MockError::UnexpectedCall {
                    interface: self.interface.name.clone(),
                    method: method.to_string(),
                })
            }
            None => Ok(None),
        }
    }

    fn interface_name(&self) -> &str {
        &self.interface.name
    }
}
