use crate::{new_workdir, OPTIMIZER, RASTERIZER};
use argon_core::{
    config::ToolsConfig,
    convert::Converter,
    dispatch::{DispatchSummary, Dispatcher},
    plan::{ColourVariant, IconClass, Planner, WorkUnit},
    resolution::{IconType, Resolution},
    tools::ToolCapabilities,
};
use integration_tests::Workdir;
use std::{path::Path, sync::Arc};

async fn run(workdir: &Workdir, units: Vec<WorkUnit>) -> DispatchSummary {
    let tools = ToolCapabilities::probe(&ToolsConfig {
        rasterizer: workdir.tool(RASTERIZER),
        optimizer: workdir.tool(OPTIMIZER),
    })
    .await
    .unwrap();
    let converter = Converter::new(Arc::new(tools));
    Dispatcher::new(4)
        .dispatch(units, move |worker, unit| {
            let converter = converter.clone();
            async move { converter.convert(&unit, worker).await }
        })
        .await
        .unwrap()
}

/// Invocations other than the version probes.
fn conversions(workdir: &Workdir, tool: &str) -> Vec<Vec<String>> {
    workdir
        .invocations(tool)
        .into_iter()
        .filter(|args| args.len() > 1)
        .collect()
}

fn temp_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".argon-"))
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn should_generate_select_icon_set() {
    let workdir = new_workdir()
        .with_file("assets/svg/icons/app/example.svg", "<svg/>")
        .with_file("assets/svg/icons-colourless/app/example.svg", "<svg/>");
    let root = workdir.path().join("assets");
    let planner = Planner::new(&root, &root);
    let units = planner
        .plan_icon_set(
            &IconClass::new("app", IconType::Select),
            Some(ColourVariant::Coloured),
            Resolution::Height(48),
        )
        .await
        .unwrap();

    let summary = run(&workdir, units).await;

    assert_eq!(summary.succeeded, 1);
    let output = root.join("icons/app/48px/example.png");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "PNG+opt");
    assert!(temp_files(output.parent().unwrap()).is_empty());

    let rasterized = conversions(&workdir, RASTERIZER);
    assert_eq!(rasterized.len(), 1);
    let args = &rasterized[0];
    let temp = args[0]
        .strip_prefix("--export-filename=")
        .expect("export flag should come first");
    let temp = Path::new(temp);
    assert_eq!(temp.parent(), output.parent());
    assert!(temp
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with(".argon-w0-"));
    assert_eq!(
        &args[1..],
        &[
            "-h".to_owned(),
            "56".to_owned(),
            root.join("svg/icons/app/example.svg").display().to_string()
        ]
    );

    assert_eq!(
        conversions(&workdir, OPTIMIZER),
        vec![vec![
            "-quiet".to_owned(),
            "-strip".to_owned(),
            "all".to_owned(),
            "-nc".to_owned(),
            temp.display().to_string()
        ]]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn should_use_legacy_export_flag() {
    let workdir = new_workdir()
        .with_stdout(RASTERIZER, "Inkscape 0.92.4 (5da689c313, 2019-01-14)\n")
        .with_file("assets/svg/select/check.svg", "<svg/>");
    let root = workdir.path().join("assets");
    let units = Planner::new(&root, &root)
        .plan_single_icon(
            &root.join("svg/select/check.svg"),
            &IconClass::new("select", IconType::Regular),
            &[Resolution::Height(24)],
        )
        .unwrap();

    let summary = run(&workdir, units).await;

    assert!(summary.is_success());
    assert!(conversions(&workdir, RASTERIZER)[0][0].starts_with("--export-png="));
    assert!(root.join("select/24px/check.png").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn should_generate_every_resolution_of_single_icon() {
    let workdir = new_workdir().with_file("assets/svg/icons/app/term.svg", "<svg/>");
    let root = workdir.path().join("assets");
    let build = workdir.path().join("build");
    let resolutions = [16, 32, 48, 64].map(Resolution::Height);
    let units = Planner::new(&root, &build)
        .plan_single_icon(
            &root.join("svg/icons/app/term.svg"),
            &IconClass::new("app", IconType::Select),
            &resolutions,
        )
        .unwrap();

    let summary = run(&workdir, units).await;

    assert_eq!(summary.succeeded, 4);
    for size in [16, 32, 48, 64] {
        let output = build.join(format!("icons/app/{}px/term.png", size));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "PNG+opt");
        assert!(temp_files(output.parent().unwrap()).is_empty());
    }
    let mut heights = conversions(&workdir, RASTERIZER)
        .iter()
        .map(|args| args[2].clone())
        .collect::<Vec<_>>();
    heights.sort();
    assert_eq!(heights, vec!["16", "37", "56", "74"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn should_contain_failing_units() {
    let workdir = new_workdir()
        .with_failure_on(RASTERIZER, "broken.svg")
        .with_file("assets/svg/places/broken.svg", "<svg/>")
        .with_file("assets/svg/places/folder.svg", "<svg/>")
        .with_file("assets/svg/places/home.svg", "<svg/>");
    let root = workdir.path().join("assets");
    let units = Planner::new(&root, &root)
        .plan_icon_set(
            &IconClass::new("places", IconType::Regular),
            None,
            Resolution::Height(32),
        )
        .await
        .unwrap();

    let summary = run(&workdir, units).await;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].error.contains("exited with error status 1"));
    let out = root.join("places/32px");
    assert!(!out.join("broken.png").exists());
    assert!(out.join("folder.png").is_file());
    assert!(out.join("home.png").is_file());
    assert!(temp_files(&out).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn should_publish_unoptimized_icon_when_optimizer_fails() {
    let workdir = new_workdir()
        .with_exit_status(OPTIMIZER, 2)
        .with_file("assets/svg/select/check.svg", "<svg/>");
    let root = workdir.path().join("assets");
    let units = Planner::new(&root, &root)
        .plan_icon_set(
            &IconClass::new("select", IconType::Select),
            None,
            Resolution::Height(32),
        )
        .await
        .unwrap();

    let summary = run(&workdir, units).await;

    assert!(summary.is_success());
    assert!(root.join("select/32px/check.png").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn should_generate_many_icons_into_shared_directory() {
    let mut workdir = new_workdir();
    for i in 0..40 {
        workdir = workdir.with_file(&format!("assets/svg/select/icon{:02}.svg", i), "<svg/>");
    }
    let root = workdir.path().join("assets");
    let units = Planner::new(&root, &root)
        .plan_icon_set(
            &IconClass::new("select", IconType::Select),
            None,
            Resolution::Height(64),
        )
        .await
        .unwrap();

    let summary = run(&workdir, units).await;

    assert_eq!(summary.succeeded, 40);
    let out = root.join("select/64px");
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 40);
    assert!(temp_files(&out).is_empty());
}
