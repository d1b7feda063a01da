use std::path::PathBuf;

/// Renders the theme's svg sources to png icons.
#[derive(clap::Parser)]
#[command(name = "argon", disable_version_flag = true)]
pub struct Cli {
    /// Sets a custom configuration file path
    #[arg(short, long, global = true, env = "ARGON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sets the source root containing the svg directory
    #[arg(long, global = true)]
    pub source_dir: Option<PathBuf>,

    /// Sets the root for generated files
    #[arg(long, global = true)]
    pub build_dir: Option<PathBuf>,

    /// Sets the number of parallel workers
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// Sets the rasterizer binary to use
    #[arg(long, global = true)]
    pub rasterizer: Option<PathBuf>,

    /// Sets the optimizer binary to use
    #[arg(long, global = true)]
    pub optimizer: Option<PathBuf>,

    /// Logs debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub subcommand: Cmd,
}

#[derive(clap::Subcommand)]
pub enum Cmd {
    /// Generates one icon at every given resolution
    Icon(icon::Cli),

    /// Generates every icon of a class at one resolution
    IconSet(icon_set::Cli),

    /// Checks the source tree for broken symlinks and missing colourless icons
    Validate,

    /// Prints version information
    Version,
}

pub mod icon {
    use argon_core::resolution::{IconType, Resolution};
    use std::path::PathBuf;

    #[derive(clap::Args)]
    pub struct Cli {
        /// The svg file to render
        #[arg(value_name = "FILE")]
        pub file: PathBuf,

        /// Resolutions to render, may be repeated
        #[arg(short, long = "resolution", required = true, num_args = 1..)]
        pub resolutions: Vec<Resolution>,

        /// Icon class, defaults to the name of the directory containing the file
        #[arg(long)]
        pub class: Option<String>,

        /// Icon type, overriding the configured type for the class
        #[arg(short = 't', long)]
        pub icon_type: Option<IconType>,

        /// Prints the planned conversions without running them
        #[arg(long)]
        pub dry_run: bool,
    }
}

pub mod icon_set {
    use argon_core::{
        plan::ColourVariant,
        resolution::{IconType, Resolution},
    };

    #[derive(clap::Args)]
    pub struct Cli {
        /// The icon class to render
        #[arg(value_name = "CLASS")]
        pub class: String,

        /// Resolution to render
        #[arg(short, long)]
        pub resolution: Resolution,

        /// Colour variant to render, for classes under the icons directories
        #[arg(long)]
        pub variant: Option<ColourVariant>,

        /// Icon type, overriding the configured type for the class
        #[arg(short = 't', long)]
        pub icon_type: Option<IconType>,

        /// Prints the planned conversions without running them
        #[arg(long)]
        pub dry_run: bool,
    }
}
