//! 自动模拟内核

use crate::cache::CreationStrategyCache;
use crate::diagnostics::{BindingReport, KernelDiagnostics};
use crate::fallback::FallbackResolver;
use crate::settings::KernelSettings;
use chrono::{DateTime, Utc};
use di_abstractions::{ContainerConfig, Mockable, Service};
use di_impl::{BindingSyntax, Container};
use mock_repository::{Mock, MockBehavior, MockRepository};
use mockbot_common::{DependencyError, DisposeError, KernelState, MockError};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 自动模拟内核
///
/// 组合依赖注入容器与模拟仓库：显式绑定优先，缺失的依赖由回退解析器补齐。
/// 内核释放时验证所有可验证的期望；未显式释放的内核在析构时完成同样的工作，
/// 验证失败会导致 panic（线程已在 panic 时改为记录错误日志并写入标准错误）。
pub struct AutoMockKernel {
    id: Uuid,
    created_at: DateTime<Utc>,
    behavior: MockBehavior,
    container: Container,
    repository: Arc<MockRepository>,
    cache: Arc<CreationStrategyCache>,
    resolving: AtomicUsize,
    disposed: bool,
}

impl AutoMockKernel {
    /// 创建宽松模式的内核
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Loose)
    }

    /// 创建指定默认模拟行为的内核
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self::with_repository(Arc::new(MockRepository::new(behavior)))
    }

    /// 使用外部模拟仓库创建内核，默认模拟行为取自仓库
    pub fn with_repository(repository: Arc<MockRepository>) -> Self {
        Self::build(repository, ContainerConfig::default())
    }

    /// 按配置创建内核
    pub fn from_settings(settings: &KernelSettings) -> Self {
        Self::build(
            Arc::new(MockRepository::new(settings.behavior)),
            settings.container_config(),
        )
    }

    fn build(repository: Arc<MockRepository>, config: ContainerConfig) -> Self {
        let cache = Arc::new(CreationStrategyCache::new());
        let mut container = Container::with_config(config);
        container.set_missing_binding_handler(Arc::new(FallbackResolver::new(
            repository.clone(),
            cache.clone(),
        )));

        let kernel = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            behavior: repository.behavior(),
            container,
            repository,
            cache,
            resolving: AtomicUsize::new(0),
            disposed: false,
        };
        info!("内核已创建: {} ({})", kernel.id, kernel.behavior);
        kernel
    }

    /// 创建模拟对象并注册为 `T` 的显式常量绑定
    ///
    /// 之后的 `get::<T>()` 返回同一个对象，覆盖已有的隐式绑定
    pub fn mock<T: Mockable + ?Sized>(&self) -> Mock<T> {
        self.mock_with(self.behavior)
    }

    /// 使用指定行为创建模拟对象并注册
    pub fn mock_with<T: Mockable + ?Sized>(&self, behavior: MockBehavior) -> Mock<T> {
        let mock = self.repository.create_with::<T>(behavior);
        self.container.bind::<T>().to_constant(mock.object());
        debug!("注册模拟对象: {} ({})", std::any::type_name::<T>(), behavior);
        mock
    }

    /// 创建宽松模式的模拟对象并注册
    pub fn stub<T: Mockable + ?Sized>(&self) -> Mock<T> {
        self.mock_with(MockBehavior::Loose)
    }

    /// 解析服务
    pub fn get<T: Service + ?Sized>(&self) -> Result<Arc<T>, DependencyError> {
        let _resolving = ResolvingGuard::enter(&self.resolving);
        self.container.get::<T>()
    }

    /// 配置服务 `T` 的显式绑定
    pub fn bind<T: Service + ?Sized>(&self) -> BindingSyntax<'_, T> {
        self.container.bind::<T>()
    }

    /// 验证所有模拟对象的可验证期望
    ///
    /// 不改变内核状态，也不清除期望，可以重复调用
    pub fn verify(&self) -> Result<(), MockError> {
        self.repository.verify()
    }

    /// 验证所有模拟对象的全部设置都被调用过
    pub fn verify_all(&self) -> Result<(), MockError> {
        self.repository.verify_all()
    }

    /// 对象是否为本内核创建的模拟对象
    pub fn is_mock<T: ?Sized + 'static>(&self, object: &Arc<T>) -> bool {
        self.repository.is_mock(object)
    }

    /// 找回对象对应的模拟句柄，隐式创建的模拟对象也可以事后设置
    pub fn mock_of<T: Mockable + ?Sized>(&self, object: &Arc<T>) -> Option<Mock<T>> {
        self.repository.find(object)
    }

    /// 注册内核释放时执行的清理回调
    pub fn on_dispose<F>(&self, hook: F)
    where
        F: FnOnce() -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
    {
        self.container.on_teardown(hook);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 默认模拟行为
    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    pub fn repository(&self) -> &Arc<MockRepository> {
        &self.repository
    }

    /// 当前状态
    pub fn state(&self) -> KernelState {
        if self.disposed {
            KernelState::Disposed
        } else if self.resolving.load(Ordering::SeqCst) > 0 {
            KernelState::Resolving
        } else {
            KernelState::Constructed
        }
    }

    /// 诊断快照
    pub fn diagnostics(&self) -> KernelDiagnostics {
        let stats = self.container.stats();
        let mut bindings: Vec<BindingReport> = self
            .container
            .bindings()
            .iter()
            .map(BindingReport::from)
            .collect();
        bindings.sort_by(|a, b| a.service.cmp(&b.service));

        KernelDiagnostics {
            kernel_id: self.id,
            created_at: self.created_at,
            behavior: self.behavior,
            state: self.state(),
            bindings,
            mocks_created: self.repository.created(),
            cached_strategies: self.cache.len(),
            resolutions: stats.resolutions,
            resolution_errors: stats.resolution_errors,
        }
    }

    /// 释放内核
    ///
    /// 先验证所有期望，再释放容器；两者的失败都会在错误中保留
    pub fn dispose(mut self) -> Result<(), DisposeError> {
        self.release()
    }

    /// 在作用域内使用内核，结束时无论结果如何都释放一次
    ///
    /// 作用域 panic 时仍会释放内核；释放也失败时，新的 panic 信息同时包含两者
    pub fn scoped<R, E, F>(self, body: F) -> Result<R, ScopeError<E>>
    where
        F: FnOnce(&Self) -> Result<R, E>,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&self)));
        let disposed = self.dispose();

        match outcome {
            Ok(Ok(value)) => disposed.map(|()| value).map_err(ScopeError::Dispose),
            Ok(Err(body)) => match disposed {
                Ok(()) => Err(ScopeError::Body(body)),
                Err(dispose) => Err(ScopeError::Both { body, dispose }),
            },
            Err(payload) => match disposed {
                Ok(()) => panic::resume_unwind(payload),
                Err(e) => {
                    let body = panic_message(&*payload);
                    error!("作用域异常退出，内核释放失败: {}", e);
                    panic!("作用域异常退出: {body}; {e}")
                }
            },
        }
    }

    fn release(&mut self) -> Result<(), DisposeError> {
        if !self.state().is_active() {
            return Ok(());
        }
        self.disposed = true;

        let verification = self.repository.verify().err();
        let teardown = self.container.dispose().err();

        if verification.is_none() && teardown.is_none() {
            info!("内核已释放: {}", self.id);
            Ok(())
        } else {
            warn!("内核释放失败: {}", self.id);
            Err(DisposeError {
                verification,
                teardown,
            })
        }
    }
}

impl Default for AutoMockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AutoMockKernel {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            if std::thread::panicking() {
                // 不能二次 panic
                error!("内核析构时释放失败: {}", e);
                eprintln!("内核析构时释放失败: {e}");
            } else {
                panic!("{}", e);
            }
        }
    }
}

impl fmt::Debug for AutoMockKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoMockKernel")
            .field("id", &self.id)
            .field("behavior", &self.behavior)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// 取出 panic 负载中的可读信息
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(error) = payload.downcast_ref::<MockError>() {
        error.to_string()
    } else {
        "未知的 panic".to_string()
    }
}

struct ResolvingGuard<'a>(&'a AtomicUsize);

impl<'a> ResolvingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 作用域错误
#[derive(Error, Debug)]
pub enum ScopeError<E> {
    /// 作用域本身返回错误，内核释放成功
    #[error("作用域执行失败: {0}")]
    Body(#[source] E),
    /// 作用域成功，内核释放失败
    #[error(transparent)]
    Dispose(DisposeError),
    /// 两者都失败
    #[error("作用域执行失败: {body}; {dispose}")]
    Both {
        #[source]
        body: E,
        dispose: DisposeError,
    },
}

impl<E> ScopeError<E> {
    /// 内核释放的错误
    pub fn dispose_error(&self) -> Option<&DisposeError> {
        match self {
            Self::Body(_) => None,
            Self::Dispose(dispose) | Self::Both { dispose, .. } => Some(dispose),
        }
    }

    /// 作用域本身的错误
    pub fn body_error(&self) -> Option<&E> {
        match self {
            Self::Body(body) | Self::Both { body, .. } => Some(body),
            Self::Dispose(_) => None,
        }
    }
}
