//! 方法设置

use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type ReturnFactory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;
type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct SetupConfig {
    verifiable: bool,
    callback: Option<Callback>,
    returns: Option<ReturnFactory>,
}

/// 一个方法的设置
pub struct Setup {
    method: &'static str,
    config: Mutex<SetupConfig>,
    calls: AtomicUsize,
}

impl Setup {
    pub(crate) fn new(method: &'static str) -> Self {
        Self {
            method,
            config: Mutex::new(SetupConfig::default()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    /// 命中次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 是否标记为必须调用
    pub fn is_verifiable(&self) -> bool {
        self.config.lock().verifiable
    }

    /// 执行一次命中：计数、回调，然后产出返回值
    ///
    /// 回调在锁外执行，回调中可以再次调用同一个模拟对象
    pub(crate) fn invoke(&self) -> Option<Box<dyn Any + Send>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (callback, returns) = {
            let config = self.config.lock();
            (config.callback.clone(), config.returns.clone())
        };
        if let Some(callback) = callback {
            callback();
        }
        returns.map(|factory| factory())
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setup")
            .field("method", &self.method)
            .field("verifiable", &self.is_verifiable())
            .field("calls", &self.calls())
            .finish()
    }
}

/// 方法设置构建器
///
/// 每一步都立即作用于设置本身，构建器可以随时丢弃
pub struct SetupBuilder {
    setup: Arc<Setup>,
}

impl SetupBuilder {
    pub(crate) fn new(setup: Arc<Setup>) -> Self {
        Self { setup }
    }

    /// 每次调用都返回该值的克隆
    pub fn returns<V>(self, value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let factory = move || -> Box<dyn Any + Send> { Box::new(value.clone()) };
        self.setup.config.lock().returns = Some(Arc::new(factory));
        self
    }

    /// 每次调用时由闭包计算返回值
    pub fn returns_with<V, F>(self, factory: F) -> Self
    where
        V: Send + 'static,
        F: Fn() -> V + Send + Sync + 'static,
    {
        let produce = move || -> Box<dyn Any + Send> { Box::new(factory()) };
        self.setup.config.lock().returns = Some(Arc::new(produce));
        self
    }

    /// 调用时执行的回调
    pub fn callback<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.setup.config.lock().callback = Some(Arc::new(callback));
        self
    }

    /// 标记为必须调用，验证时未被调用即失败
    pub fn verifiable(self) -> Self {
        self.setup.config.lock().verifiable = true;
        self
    }

    /// 对应的设置
    pub fn setup(&self) -> &Arc<Setup> {
        &self.setup
    }
}
