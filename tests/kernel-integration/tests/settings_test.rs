//! 配置加载、诊断快照与日志初始化


use common::*;
use mockbot::{
    init_logging, AutoMockKernel, DependencyError, KernelDiagnostics, KernelSettings,
    LoggingConfig, MockBehavior,
};
use std::io::Write;

fn write_settings(content: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_kernel_from_settings_file() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::test())?;

    let file = write_settings(
        r#"
behavior = "strict"
max_resolution_depth = 32
"#,
    )?;
    let settings = KernelSettings::load_with_prefix(file.path(), "MOCKBOT_IT_STRICT")?;

    let kernel = AutoMockKernel::from_settings(&settings);
    assert_eq!(kernel.behavior(), MockBehavior::Strict);
    assert_eq!(kernel.mock::<dyn ICounter>().behavior(), MockBehavior::Strict);

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_resolution_depth_limit_from_settings() -> anyhow::Result<()> {
    let file = write_settings("max_resolution_depth = 2\n")?;
    let settings = KernelSettings::load_with_prefix(file.path(), "MOCKBOT_IT_DEPTH")?;
    let kernel = AutoMockKernel::from_settings(&settings);

    let error = kernel.get::<Top>().unwrap_err();
    assert!(matches!(
        error,
        DependencyError::MaxDepthExceeded { max_depth: 2, .. }
    ));
    assert!(kernel.get::<Bottom>().is_ok());

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_circular_detection_can_be_disabled() -> anyhow::Result<()> {
    let file = write_settings(
        r#"
detect_circular_dependencies = false
max_resolution_depth = 8
"#,
    )?;
    let settings = KernelSettings::load_with_prefix(file.path(), "MOCKBOT_IT_CIRCULAR")?;
    let kernel = AutoMockKernel::from_settings(&settings);

    let error = kernel.get::<Ouroboros>().unwrap_err();
    assert!(matches!(error, DependencyError::MaxDepthExceeded { .. }));

    kernel.dispose()?;
    Ok(())
}

#[test]
fn test_diagnostics_serialize_to_json() -> anyhow::Result<()> {
    let kernel = AutoMockKernel::new();
    kernel.bind::<dyn IServiceA>().to::<ServiceA>().in_singleton_scope();
    kernel.get::<Controller>()?;
    let _ = kernel.get::<u32>();

    let diagnostics = kernel.diagnostics();
    assert_eq!(diagnostics.resolutions, 2);
    assert_eq!(diagnostics.resolution_errors, 1);
    assert_eq!(diagnostics.mocks_created, 1);

    let json = serde_json::to_value(&diagnostics)?;
    assert_eq!(json["behavior"], "loose");
    assert_eq!(json["state"], "constructed");

    let bindings = json["bindings"].as_array().unwrap();
    let names: Vec<&str> = bindings
        .iter()
        .map(|binding| binding["service"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Controller", "IServiceA", "IServiceB", "u32"]);

    let restored: KernelDiagnostics = serde_json::from_value(json)?;
    assert_eq!(restored.kernel_id, kernel.id());
    let service_a = restored.binding("IServiceA").unwrap();
    assert!(!service_a.implicit);
    assert_eq!(service_a.lifetime.to_string(), "singleton");
    assert_eq!(restored.implicit_bindings().count(), 3);

    kernel.dispose()?;
    Ok(())
}
