//! 自动模拟内核的解析与验证场景


use common::*;
use mockbot::{AutoMockKernel, DependencyError, MockBehavior, MockError, ProviderKind};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_loose_mock_returns_defaults() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();

    let counter = kernel.get::<dyn ICounter>()?;
    assert_eq!(counter.next(), 0);
    assert_eq!(counter.label(), "");

    kernel.get::<dyn IServiceA>()?.run_a();
    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_strict_mock_rejects_unconfigured_calls() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::with_behavior(MockBehavior::Strict);
    let a = kernel.get::<dyn IServiceA>()?;

    let payload = catch_unwind(AssertUnwindSafe(|| a.run_a())).unwrap_err();
    let error = payload.downcast::<MockError>().unwrap();
    assert!(matches!(
        *error,
        MockError::UnexpectedCall { ref interface, ref method }
            if interface == "IServiceA" && method == "run_a"
    ));

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_strict_mock_accepts_configured_calls() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::with_behavior(MockBehavior::Strict);
    kernel.mock::<dyn IServiceA>().setup("run_a");
    kernel
        .mock::<dyn IServiceB>()
        .setup("run_b")
        .callback(|| {});

    let controller = kernel.get::<Controller>()?;
    controller.run_both();
    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_stub_is_loose_on_strict_kernel() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::with_behavior(MockBehavior::Strict);
    let counter = kernel.stub::<dyn ICounter>();
    assert_eq!(counter.behavior(), MockBehavior::Loose);
    assert_eq!(kernel.get::<dyn ICounter>()?.next(), 0);
    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_verify_names_unmet_expectation() {
    let kernel = AutoMockKernel::new();
    kernel.mock::<dyn IServiceA>().setup("run_a").verifiable();
    kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();

    let controller = kernel.get::<Controller>().unwrap();
    controller.run_a_only();

    let error = kernel.verify().unwrap_err();
    let unmet = error.unmet_expectations();
    assert_eq!(unmet.len(), 1);
    assert_eq!(unmet[0].interface, "IServiceB");
    assert_eq!(unmet[0].method, "run_b");
    assert!(error.to_string().contains("IServiceB::run_b"));

    // 验证不改变状态，补上调用后再次验证即可通过
    controller.run_both();
    assert!(kernel.verify().is_ok());
    assert!(kernel.dispose().is_ok());
}

#[test]
fn test_verify_succeeds_when_every_expectation_is_met() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    kernel.mock::<dyn IServiceA>().setup("run_a").verifiable();
    kernel.mock::<dyn IServiceB>().setup("run_b").verifiable();

    kernel.get::<Controller>()?.run_both();
    kernel.verify()?;
    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_verify_all_includes_non_verifiable_setups() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    kernel.mock::<dyn IServiceA>().setup("run_a");

    assert!(kernel.verify().is_ok());
    let error = kernel.verify_all().unwrap_err();
    assert_eq!(error.unmet_expectations()[0].method, "run_a");

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_unbound_interface_resolves_to_fresh_mocks() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();

    let first = kernel.get::<dyn IServiceA>()?;
    let second = kernel.get::<dyn IServiceA>()?;

    assert!(kernel.is_mock(&first));
    assert!(kernel.is_mock(&second));
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(kernel.repository().created(), 2);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_explicit_binding_wins_over_fallback() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    kernel.bind::<dyn IServiceA>().to::<ServiceA>();

    let a = kernel.get::<dyn IServiceA>()?;
    assert!(!kernel.is_mock(&a));
    assert!(kernel.mock_of(&a).is_none());
    assert_eq!(kernel.repository().created(), 0);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_method_binding_resolves_dependencies_through_kernel() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    kernel.bind::<dyn IServiceA>().to_method(|ctx| {
        let service: Arc<dyn IServiceA> = Arc::new(ChainedServiceA {
            b: ctx.get::<dyn IServiceB>()?,
        });
        Ok(service)
    });

    let a = kernel.get::<dyn IServiceA>()?;
    assert!(!kernel.is_mock(&a));
    a.run_a();

    let diagnostics = kernel.diagnostics();
    assert_eq!(
        diagnostics.binding("IServiceA").unwrap().provider,
        ProviderKind::Method.as_str()
    );
    assert_eq!(
        diagnostics.binding("IServiceB").unwrap().provider,
        ProviderKind::Mock.as_str()
    );

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_registered_mock_is_returned_by_get() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    let mock = kernel.mock::<dyn ICounter>();
    mock.setup("next").returns(5u32);
    mock.setup("label").returns("primary".to_string());

    let counter = kernel.get::<dyn ICounter>()?;
    assert!(Arc::ptr_eq(&counter, &mock.object()));
    assert_eq!(counter.next(), 5);
    assert_eq!(counter.label(), "primary");
    assert_eq!(mock.invocations("next"), 1);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_mock_registration_replaces_implicit_binding() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    let implicit = kernel.get::<dyn ICounter>()?;

    let mock = kernel.mock::<dyn ICounter>();
    let registered = kernel.get::<dyn ICounter>()?;
    assert!(!Arc::ptr_eq(&implicit, &registered));
    assert!(Arc::ptr_eq(&registered, &mock.object()));
    assert!(!kernel.diagnostics().binding("ICounter").unwrap().implicit);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_computed_returns_and_callbacks() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let seen = calls.clone();
    let mock = kernel.mock::<dyn ICounter>();
    mock.setup("next")
        .callback(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .returns_with(|| 9u32);

    let reporter = kernel.get::<Reporter>()?;
    assert_eq!(reporter.counter.next(), 9);
    assert_eq!(reporter.counter.next(), 9);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_concrete_component_is_activated_with_mocked_dependencies() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();

    let reporter = kernel.get::<Reporter>()?;
    assert!(kernel.is_mock(&reporter.counter));
    assert!(reporter.fallback.is_none());
    assert_eq!(reporter.reports, 0);

    let top = kernel.get::<Top>()?;
    assert!(kernel.is_mock(&top.0.0.0));

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_value_types_cannot_be_mocked() {
    let kernel = AutoMockKernel::new();

    let error = kernel.get::<u32>().unwrap_err();
    match error {
        DependencyError::MockCreationFailed { type_name, source } => {
            assert_eq!(type_name, "u32");
            assert!(matches!(source, MockError::Unmockable { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    let error = kernel.get::<String>().unwrap_err();
    assert!(matches!(error, DependencyError::MockCreationFailed { .. }));
    assert!(kernel.dispose().is_ok());
}

#[test]
fn test_circular_dependency_is_reported() {
    let kernel = AutoMockKernel::new();

    let error = kernel.get::<Ouroboros>().unwrap_err();
    match error {
        DependencyError::CircularDependency { dependency_chain } => {
            assert_eq!(dependency_chain, "Ouroboros -> Ouroboros");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(kernel.dispose().is_ok());
}

#[test]
fn test_optional_self_reference_still_reports_cycle() {
    let kernel = AutoMockKernel::new();

    let error = kernel.get::<Loop>().err().unwrap();
    match error {
        DependencyError::CircularDependency { dependency_chain } => {
            assert_eq!(dependency_chain, "Loop -> Loop");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(kernel.dispose().is_ok());
}

#[test]
fn test_late_setup_on_implicit_mock() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    let controller = kernel.get::<Controller>()?;

    let b = kernel.mock_of(&controller.b).unwrap();
    b.setup("run_b").verifiable();
    assert!(kernel.verify().is_err());

    controller.run_both();
    kernel.dispose()?;
    Ok(())
}
