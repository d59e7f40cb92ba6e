mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use floorscan_core::extraction::Granularity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "floorscan",
    version,
    about = "Extract rooms and dimensions from floorplan PDFs"
)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GranularityArg {
    /// One fragment per text block
    Block,
    /// One fragment per text line
    Line,
}

impl From<GranularityArg> for Granularity {
    fn from(g: GranularityArg) -> Self {
        match g {
            GranularityArg::Block => Granularity::Block,
            GranularityArg::Line => Granularity::Line,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a floorplan PDF into rooms, dimensions and codes
    Parse {
        /// Path to PDF file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Custom JSON config file (default: built-in thresholds)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// How text is cut into fragments
        #[arg(long, value_enum, default_value = "block")]
        granularity: GranularityArg,
    },
    /// Write one annotated SVG per page (green rooms, red dimensions, blue codes)
    Annotate {
        /// Path to PDF file
        input_file: PathBuf,

        /// Directory for the SVG files
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Custom JSON config file (default: built-in thresholds)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// How text is cut into fragments
        #[arg(long, value_enum, default_value = "block")]
        granularity: GranularityArg,

        /// Draw boxes only, without rendering the page underneath
        #[arg(long)]
        no_background: bool,
    },
    /// Parse and annotate in one go, replacing previous outputs
    Run {
        /// Path to PDF file
        input_file: PathBuf,

        /// JSON output file
        #[arg(long, value_name = "FILE", default_value = "floorplan_data.json")]
        json: PathBuf,

        /// Directory for the annotated SVG files
        #[arg(short = 'd', long, value_name = "DIR", default_value = "floorplan_annotated")]
        out_dir: PathBuf,

        /// Custom JSON config file (default: built-in thresholds)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Inspect and validate extraction configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config as JSON
    Show {
        /// Custom JSON config file (default: built-in thresholds)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Validate a custom config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
            config,
            granularity,
        } => commands::parse::run(input_file, &output, out, config, granularity.into()),
        Commands::Annotate {
            input_file,
            out_dir,
            config,
            granularity,
            no_background,
        } => commands::annotate::run(
            input_file,
            out_dir,
            config,
            granularity.into(),
            !no_background,
        ),
        Commands::Run {
            input_file,
            json,
            out_dir,
            config,
        } => commands::run::run(input_file, json, out_dir, config),
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => commands::config::show(config.as_deref()),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
