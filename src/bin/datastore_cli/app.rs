use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use crate::commands;
use crate::context::Context;
use crate::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "datastore-cli")]
#[command(about = "Check datastore requests against their operation rules", long_about = None)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON rule set to use instead of the built-in datastore rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a request (read from FILE, or stdin when omitted)
    Validate {
        /// Operation whose rule applies (get, save, update, scan, query, remove)
        operation: String,

        /// Request file; "-" or nothing reads stdin
        file: Option<PathBuf>,
    },

    /// Print the rule set, or the rule of one operation
    Rules {
        operation: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Run the CLI, returning a failing exit code when a request is rejected
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let context = Context::new(cli.format, cli.rules.as_deref(), !cli.no_color)?;
    info!("Loaded {} operation rules", context.rules().len());

    match cli.command {
        Commands::Validate { operation, file } => {
            let valid = commands::validate::execute(&context, &operation, file.as_deref())?;
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Rules { operation } => {
            let found = commands::rules::execute(&context, operation.as_deref())?;
            Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
