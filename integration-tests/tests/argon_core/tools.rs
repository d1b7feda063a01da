use crate::{new_workdir, OPTIMIZER, RASTERIZER};
use argon_core::{
    config::ToolsConfig,
    tools::{ExportFlag, ProbeError, ToolCapabilities, Version},
};
use integration_tests::Workdir;

fn tools_config(workdir: &Workdir) -> ToolsConfig {
    ToolsConfig {
        rasterizer: workdir.tool(RASTERIZER),
        optimizer: workdir.tool(OPTIMIZER),
    }
}

#[tokio::test]
async fn should_probe_modern_rasterizer() {
    let workdir = new_workdir();

    let tools = ToolCapabilities::probe(&tools_config(&workdir)).await.unwrap();

    assert_eq!(tools.rasterizer_version, Version { major: 1, minor: 2 });
    assert_eq!(tools.export_flag, ExportFlag::ExportFilename);
    assert!(tools.optimizer.is_some());
    assert_eq!(workdir.invocations(RASTERIZER), vec![vec!["--version"]]);
    assert_eq!(workdir.invocations(OPTIMIZER), vec![vec!["-v"]]);
}

#[tokio::test]
async fn should_probe_legacy_rasterizer() {
    let workdir = new_workdir().with_stdout(RASTERIZER, "Inkscape 0.92.4 (5da689c313, 2019-01-14)\n");

    let tools = ToolCapabilities::probe(&tools_config(&workdir)).await.unwrap();

    assert_eq!(tools.rasterizer_version, Version { major: 0, minor: 92 });
    assert_eq!(tools.export_flag, ExportFlag::ExportPng);
}

#[tokio::test]
async fn should_run_rasterizer_with_self_call_override() {
    let workdir = new_workdir();

    ToolCapabilities::probe(&tools_config(&workdir)).await.unwrap();

    workdir.env(RASTERIZER).assert_var("SELF_CALL", "xxx");
}

#[tokio::test]
async fn should_continue_without_optimizer() {
    let workdir = Workdir::new()
        .with_tool(RASTERIZER)
        .with_stdout(RASTERIZER, "Inkscape 1.0.1 (3bc2e813f5, 2020-09-07)\n");

    let tools = ToolCapabilities::probe(&tools_config(&workdir)).await.unwrap();

    assert!(tools.optimizer.is_none());
}

#[tokio::test]
async fn should_fail_on_unparsable_version() {
    let workdir = new_workdir().with_stdout(RASTERIZER, "something went wrong\n");

    let result = ToolCapabilities::probe(&tools_config(&workdir)).await;

    assert!(matches!(result, Err(ProbeError::UnknownVersion(..))));
}

#[tokio::test]
async fn should_fail_without_rasterizer() {
    let workdir = Workdir::new().with_tool(OPTIMIZER);

    let result = ToolCapabilities::probe(&tools_config(&workdir)).await;

    assert!(matches!(result, Err(ProbeError::RasterizerMissing(..))));
}
