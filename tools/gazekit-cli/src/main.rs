//! Gazekit CLI: fixation detection, AOI metrics and plots for eye-tracking
//! sessions.
//!
//! Usage:
//!   gazekit detect <SAMPLES>            Detect fixations and export them
//!   gazekit analyze <SAMPLES>           Print and save AOI metrics
//!   gazekit render <KIND> <SAMPLES>     Draw a heatmap or scanpath PNG
//!   gazekit init                        Write the default AOI layout
//!   gazekit layout <PATH>               List the pages and AOIs of a layout

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gazekit_common::config::AppConfig;

mod commands;

use commands::{FixationFormat, InputArgs, PlotKind};

#[derive(Parser)]
#[command(
    name = "gazekit",
    about = "Eye-tracking fixation detection and area-of-interest analysis",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file; must exist and parse (defaults to $XDG_CONFIG_HOME/gazekit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect fixations in a gaze sample CSV
    Detect {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (defaults to <output_dir>/fixations.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: FixationFormat,
    },

    /// Compute TTFF, dwell time and the session summary for one page
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// AOI layout JSON (defaults to the built-in storefront layout)
        #[arg(long)]
        aois: Option<PathBuf>,

        /// Page whose AOIs are evaluated
        #[arg(long)]
        page: Option<String>,

        /// Baseline timestamp in ms (defaults to the first fixation start)
        #[arg(long)]
        start: Option<i64>,

        /// End timestamp in ms (defaults to the last fixation end)
        #[arg(long)]
        end: Option<i64>,

        /// Report file (defaults to <output_dir>/report.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a heatmap or scanpath PNG with a JSON sidecar
    Render {
        /// Plot kind
        #[arg(value_enum)]
        kind: PlotKind,

        #[command(flatten)]
        input: InputArgs,

        /// AOI layout JSON (defaults to the built-in storefront layout)
        #[arg(long)]
        aois: Option<PathBuf>,

        /// Page whose AOIs are outlined
        #[arg(long)]
        page: Option<String>,

        /// Heatmap canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Heatmap canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Heatmap Gaussian spread in pixels
        #[arg(long)]
        sigma: Option<f64>,

        /// Screenshot drawn under the heatmap
        #[arg(long)]
        background: Option<PathBuf>,

        /// Image file (defaults to <output_dir>/<kind>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the built-in storefront AOI layout to a file
    Init {
        /// Output file
        #[arg(short, long, default_value = "aois.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Also write a default config file to the standard location
        #[arg(long)]
        with_config: bool,
    },

    /// List the pages and AOIs of a layout file
    Layout {
        /// Path to the AOI layout JSON
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::try_load_from(path)?,
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    gazekit_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Detect {
            input,
            output,
            format,
        } => commands::detect::run(&config, input, output, format),
        Commands::Analyze {
            input,
            aois,
            page,
            start,
            end,
            output,
        } => commands::analyze::run(&config, input, aois, page, start, end, output),
        Commands::Render {
            kind,
            input,
            aois,
            page,
            width,
            height,
            sigma,
            background,
            output,
        } => commands::render::run(
            &config,
            kind,
            input,
            aois,
            page,
            commands::render::CanvasOverrides {
                width,
                height,
                sigma,
                background,
            },
            output,
        ),
        Commands::Init {
            output,
            force,
            with_config,
        } => commands::init::run(output, force, with_config),
        Commands::Layout { path } => commands::layout::run(path),
    }
}
