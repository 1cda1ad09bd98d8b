//! K2C9 CLI - Command-line interface
//!
//! Checks sky positions against the K2 Campaign 9 footprint and renders
//! footprint maps.
//!
//! ```text
//! k2c9 check "270.0 -28.0,18:04:00 -30:00:00" --format csv
//! k2c9 visibility "18h00m00s -28d00m00s"
//! k2c9 plot --pos "270.0 -28.0" --size 2 --output k2c9.png
//! k2c9 config set plot.width 1024
//! ```

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;
use k2c9::config::ConfigFile;
use k2c9::logging::init_logging;
use tracing::debug;

use commands::common::{build_service, FormatArg, ImageFormatArg};
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "k2c9", version, about = "K2 Campaign 9 footprint queries")]
struct Cli {
    /// Footprint geometry file (JSON); overrides footprint.file from config
    #[arg(long, global = true, value_name = "FILE")]
    footprint: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report whether each position lies inside the footprint
    Check {
        /// Comma-separated positions (e.g. "270.0 -28.0,18:04:00 -30:00:00")
        #[arg(allow_hyphen_values = true)]
        pos: String,

        /// Output layout; defaults to output.format from config
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Show each position in both notations with its membership
    Visibility {
        /// Comma-separated positions
        #[arg(allow_hyphen_values = true)]
        pos: String,
    },

    /// Render the footprint map to an image file
    Plot {
        /// Comma-separated positions to mark
        #[arg(long, allow_hyphen_values = true)]
        pos: Option<String>,

        /// View width in degrees, centred on the positions
        #[arg(long, allow_hyphen_values = true)]
        size: Option<f64>,

        /// Image format; defaults to plot.format from config
        #[arg(long, value_enum)]
        image_format: Option<ImageFormatArg>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Run a sample query through every output
    Demo,

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let command = match cli.command {
        Commands::Config { command } => return commands::config::run(command),
        other => other,
    };

    let config = ConfigFile::load()?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    let _guard = init_logging(&logging)?;
    debug!(?command, "Starting");

    let image_format = match &command {
        Commands::Plot { image_format, .. } => *image_format,
        _ => None,
    };
    let service = build_service(cli.footprint.as_deref(), &config, image_format)?;

    match command {
        Commands::Check { pos, format } => commands::check::run(&service, &config, &pos, format),
        Commands::Visibility { pos } => commands::visibility::run(&service, &pos),
        Commands::Plot {
            pos, size, output, ..
        } => commands::plot::run(&service, pos.as_deref(), size, &output),
        Commands::Demo => commands::demo::run(&service),
        // handled before logging starts
        Commands::Config { .. } => Ok(()),
    }
}
