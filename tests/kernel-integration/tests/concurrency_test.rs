//! 多线程并发解析


use common::*;
use mockbot::AutoMockKernel;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_shares_creation_strategy() -> anyhow::Result<()> {
    let kernel = Arc::new(AutoMockKernel::new());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let kernel = kernel.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let counter = kernel.get::<dyn ICounter>()?;
            let is_mock = kernel.is_mock(&counter);
            Ok::<_, mockbot::DependencyError>((counter.next(), is_mock))
        }));
    }

    for handle in handles {
        let (value, is_mock) = handle.await??;
        assert_eq!(value, 0);
        assert!(is_mock);
    }

    let diagnostics = kernel.diagnostics();
    assert_eq!(diagnostics.mocks_created, 16);
    assert_eq!(diagnostics.cached_strategies, 1);
    assert_eq!(diagnostics.implicit_bindings().count(), 1);

    let kernel = Arc::try_unwrap(kernel).map_err(|_| anyhow::anyhow!("内核仍被引用"))?;
    kernel.dispose()?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_are_all_recorded() -> anyhow::Result<()> {
    let kernel = Arc::new(AutoMockKernel::new());
    let mock = kernel.mock::<dyn IServiceB>();
    mock.setup("run_b").verifiable();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let kernel = kernel.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            kernel.get::<Controller>().map(|controller| controller.run_both())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(mock.invocations("run_b"), 8);
    kernel.verify()?;

    let kernel = Arc::try_unwrap(kernel).map_err(|_| anyhow::anyhow!("内核仍被引用"))?;
    kernel.dispose()?;
    Ok(())
}
