//! 内核释放、作用域与析构的场景


use common::*;
use mockbot::{AutoMockKernel, KernelState, LifecycleError, ScopeError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_dispose_verifies_expectations() {
    let kernel = AutoMockKernel::new();
    kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();

    let error = kernel.dispose().unwrap_err();
    assert!(error.has_verification_failure());
    assert!(!error.has_teardown_failure());
    assert_eq!(
        error.verification.as_ref().unwrap().unmet_expectations()[0].method,
        "run_b"
    );
}

#[test]
fn test_dispose_runs_teardown_hooks() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    let released = Arc::new(AtomicBool::new(false));

    let flag = released.clone();
    kernel.on_dispose(move || {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    kernel.dispose()?;
    assert!(released.load(Ordering::SeqCst));
    Ok(())
}

#[test]
fn test_teardown_failure_is_kept_alongside_verification_failure() {
    let kernel = AutoMockKernel::new();
    kernel.mock::<dyn IServiceA>().setup("run_a").verifiable();
    kernel.on_dispose(|| Err("socket closed".into()));

    let error = kernel.dispose().unwrap_err();
    assert!(error.has_verification_failure());
    assert!(matches!(
        error.teardown,
        Some(LifecycleError::TeardownFailed { ref message }) if message.contains("socket closed")
    ));

    let message = error.to_string();
    assert!(message.contains("IServiceA::run_a"));
    assert!(message.contains("socket closed"));
}

#[test]
fn test_teardown_failure_alone() {
    let kernel = AutoMockKernel::new();
    kernel.get::<Controller>().unwrap();
    kernel.on_dispose(|| Err("disk full".into()));

    let error = kernel.dispose().unwrap_err();
    assert!(!error.has_verification_failure());
    assert!(error.has_teardown_failure());
}

#[test]
fn test_scoped_returns_body_value() {
    let value = AutoMockKernel::new()
        .scoped(|kernel| -> anyhow::Result<u32> {
            let mock = kernel.mock::<dyn ICounter>();
            mock.setup("next").returns(3u32).verifiable();
            Ok(kernel.get::<Reporter>()?.counter.next())
        })
        .unwrap();
    assert_eq!(value, 3);
}

#[test]
fn test_scoped_verifies_on_exit() {
    let error = AutoMockKernel::new()
        .scoped(|kernel| -> anyhow::Result<()> {
            kernel.mock::<dyn IServiceA>().setup("run_a").verifiable();
            kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();
            kernel.get::<Controller>()?.run_a_only();
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(error, ScopeError::Dispose(_)));
    assert!(error.body_error().is_none());
    let dispose = error.dispose_error().unwrap();
    assert_eq!(
        dispose.verification.as_ref().unwrap().unmet_expectations()[0].method,
        "run_b"
    );
}

#[test]
fn test_scoped_reports_body_error() {
    let error = AutoMockKernel::new()
        .scoped(|kernel| -> Result<(), String> {
            kernel.get::<dyn IServiceA>().map_err(|e| e.to_string())?;
            Err("body failed".to_string())
        })
        .unwrap_err();

    assert!(matches!(error, ScopeError::Body(ref body) if body == "body failed"));
    assert!(error.dispose_error().is_none());
}

#[test]
fn test_scoped_reports_both_failures() {
    let error = AutoMockKernel::new()
        .scoped(|kernel| -> Result<(), String> {
            kernel.mock::<dyn IServiceA>().setup("run_a").verifiable();
            Err("body failed".to_string())
        })
        .unwrap_err();

    assert_eq!(error.body_error().map(String::as_str), Some("body failed"));
    assert!(error.dispose_error().unwrap().has_verification_failure());
    let message = error.to_string();
    assert!(message.contains("body failed"));
    assert!(message.contains("IServiceA::run_a"));
}

#[test]
fn test_scoped_panic_still_releases_kernel() {
    let released = Arc::new(AtomicBool::new(false));
    let kernel = AutoMockKernel::new();

    let flag = released.clone();
    kernel.on_dispose(move || {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let outcome = catch_unwind(AssertUnwindSafe(move || {
        kernel.scoped(|_| -> Result<(), String> { panic!("scope body panicked") })
    }));

    assert!(outcome.is_err());
    assert!(released.load(Ordering::SeqCst));
}

#[test]
fn test_scoped_panic_carries_unmet_expectation() {
    let outcome = catch_unwind(|| {
        AutoMockKernel::new().scoped(|kernel| -> Result<(), String> {
            kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();
            panic!("scope body panicked")
        })
    });

    let payload = outcome.unwrap_err();
    let message = payload.downcast_ref::<String>().unwrap();
    assert!(message.contains("scope body panicked"));
    assert!(message.contains("IServiceB::run_b"));
}

#[test]
fn test_drop_verifies_implicitly() {
    let outcome = catch_unwind(|| {
        let kernel = AutoMockKernel::new();
        kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();
    });
    assert!(outcome.is_err());

    let outcome = catch_unwind(|| {
        let kernel = AutoMockKernel::new();
        kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();
        kernel.get::<dyn IServiceB>().unwrap().run_b();
    });
    assert!(outcome.is_ok());
}

#[test]
fn test_state_is_constructed_between_resolutions() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    assert_eq!(kernel.state(), KernelState::Constructed);

    kernel.get::<Top>()?;
    assert_eq!(kernel.state(), KernelState::Constructed);
    assert_eq!(kernel.diagnostics().state, KernelState::Constructed);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_state_is_resolving_inside_method_binding() -> anyhow::Result<()> {
    let kernel = Arc::new(AutoMockKernel::new());
    let observed = Arc::new(Mutex::new(None));

    let inner = Arc::downgrade(&kernel);
    let seen = observed.clone();
    kernel.bind::<dyn IServiceA>().to_method(move |_ctx| {
        if let Some(kernel) = inner.upgrade() {
            *seen.lock().unwrap() = Some(kernel.state());
        }
        let service: Arc<dyn IServiceA> = Arc::new(ServiceA);
        Ok(service)
    });

    kernel.get::<dyn IServiceA>()?;
    assert_eq!(*observed.lock().unwrap(), Some(KernelState::Resolving));
    assert_eq!(kernel.state(), KernelState::Constructed);

    let kernel = Arc::try_unwrap(kernel).map_err(|_| anyhow::anyhow!("内核仍被引用"))?;
    kernel.dispose()?;
    Ok(())
}
