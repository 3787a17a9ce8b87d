mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Loader and checker for block-structured game configuration files.
#[derive(Parser)]
#[command(
    name = "udbcfg",
    version,
    about = "Loader and checker for block-structured game configuration files"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration file with its includes and print the result
    Load {
        /// Path to the root configuration file
        file: PathBuf,
    },

    /// Load every configuration file under a directory and report failures
    Check {
        /// Directory to walk recursively
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Commands::Load { file } => {
            commands::load::cmd_load(&file, cli.output, cli.quiet);
        }
        Commands::Check { dir } => {
            commands::check::cmd_check(&dir, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`, `error` with `--quiet`).
fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error message to stderr in the requested format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            let err_json = serde_json::json!({ "error": msg });
            eprintln!("{}", err_json);
        }
    }
}
