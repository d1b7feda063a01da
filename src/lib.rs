use crate::cli::{Cli, Cmd};
use argon_core::config::Config;
use clap::Parser as _;
use std::path::Path;

mod cli;
mod commands;

const DEFAULT_CONFIG_FILE: &str = "argon.toml";

fn setup_logger(verbose: bool) -> eyre::Result<()> {
    use std::io::IsTerminal as _;
    use tracing::Level;
    use tracing_subscriber::{
        filter::LevelFilter,
        fmt::{layer, writer::MakeWriterExt as _},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        Registry,
    };

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // warnings and errors go to stderr, progress to stdout
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);
    Registry::default()
        .with(LevelFilter::from(level))
        .with(
            layer()
                .with_ansi(std::io::stdout().is_terminal())
                .with_target(false)
                .without_time()
                .with_writer(writer),
        )
        .try_init()?;
    Ok(())
}

async fn load_config(cli: &Cli) -> eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::parse_file(path).await?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            Config::parse_file(Path::new(DEFAULT_CONFIG_FILE)).await?
        }
        None => Config::default(),
    };

    if let Some(source_dir) = &cli.source_dir {
        config.source_dir = source_dir.clone();
    }
    if let Some(build_dir) = &cli.build_dir {
        config.build_dir = Some(build_dir.clone());
    }
    if let Some(rasterizer) = &cli.rasterizer {
        config.tools.rasterizer = rasterizer.clone();
    }
    if let Some(optimizer) = &cli.optimizer {
        config.tools.optimizer = optimizer.clone();
    }
    Ok(config)
}

/// Parses the command line and runs the selected command.
pub async fn run() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    setup_logger(cli.verbose)?;
    let config = load_config(&cli).await?;

    match cli.subcommand {
        Cmd::Icon(args) => commands::icon(&config, cli.jobs, args).await,
        Cmd::IconSet(args) => commands::icon_set(&config, cli.jobs, args).await,
        Cmd::Validate => commands::validate(&config),
        Cmd::Version => commands::version(&config).await,
    }
}
