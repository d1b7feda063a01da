use crate::cli;
use argon_core::{
    config::Config,
    convert::Converter,
    dispatch::Dispatcher,
    plan::{IconClass, Planner, WorkUnit},
    tools::ToolCapabilities,
    validate,
};
use std::{sync::Arc, time::Instant};

fn planner(config: &Config) -> Planner {
    Planner::new(&config.source_dir, config.build_dir())
}

fn dispatcher(config: &Config, jobs: Option<usize>) -> Dispatcher {
    match jobs {
        Some(jobs) => Dispatcher::new(jobs),
        None => Dispatcher::with_workers_per_core(config.workers_per_core),
    }
}

fn print_plan(units: &[WorkUnit]) {
    for unit in units {
        println!("{}", unit);
    }
    println!("{} icon(s) planned", units.len());
}

async fn generate(config: &Config, jobs: Option<usize>, units: Vec<WorkUnit>) -> eyre::Result<()> {
    let tools = Arc::new(ToolCapabilities::probe(&config.tools).await?);
    let converter = Converter::new(tools);
    let dispatcher = dispatcher(config, jobs);
    let total = units.len();
    let start = Instant::now();

    let summary = dispatcher
        .dispatch(units, move |worker, unit| {
            let converter = converter.clone();
            async move { converter.convert(&unit, worker).await }
        })
        .await?;

    let elapsed = std::time::Duration::from_millis(start.elapsed().as_millis() as u64);
    tracing::info!(
        "generated {} of {} icon(s) in {} using {} worker(s)",
        summary.succeeded,
        total,
        humantime::format_duration(elapsed),
        dispatcher.workers()
    );
    if !summary.is_success() {
        eyre::bail!("{} of {} icon(s) failed to generate", summary.failed.len(), total);
    }
    Ok(())
}

pub async fn icon(config: &Config, jobs: Option<usize>, args: cli::icon::Cli) -> eyre::Result<()> {
    let class_name = match args.class {
        Some(class) => class,
        None => args
            .file
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| eyre::eyre!("can't determine icon class of {}", args.file.display()))?,
    };
    let icon_type = args
        .icon_type
        .unwrap_or_else(|| config.icon_type(&class_name));
    let class = IconClass::new(class_name, icon_type);

    let units = planner(config).plan_single_icon(&args.file, &class, &args.resolutions)?;
    if args.dry_run {
        print_plan(&units);
        return Ok(());
    }
    generate(config, jobs, units).await
}

pub async fn icon_set(
    config: &Config,
    jobs: Option<usize>,
    args: cli::icon_set::Cli,
) -> eyre::Result<()> {
    let icon_type = args
        .icon_type
        .unwrap_or_else(|| config.icon_type(&args.class));
    let class = IconClass::new(args.class, icon_type);

    let units = planner(config)
        .plan_icon_set(&class, args.variant, args.resolution)
        .await?;
    if args.dry_run {
        print_plan(&units);
        return Ok(());
    }
    generate(config, jobs, units).await
}

pub fn validate(config: &Config) -> eyre::Result<()> {
    validate::validate(&config.source_dir)?;
    println!("{} is valid", config.source_dir.display());
    Ok(())
}

pub async fn version(config: &Config) -> eyre::Result<()> {
    println!("argon: {}", env!("CARGO_PKG_VERSION"));

    match ToolCapabilities::probe(&config.tools).await {
        Ok(tools) => {
            println!(
                "{}: {} (using {})",
                tools.rasterizer.name(),
                tools.rasterizer_version,
                tools.export_flag.flag()
            );
            match &tools.optimizer {
                Some(optimizer) => println!("{}: available", optimizer.name()),
                None => println!("{}: not found", config.tools.optimizer.display()),
            }
        }
        Err(err) => println!(
            "Could not determine rasterizer version ({}), is it installed correctly?",
            err
        ),
    }
    Ok(())
}
