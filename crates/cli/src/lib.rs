pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quoteflow_core::config::LoadOptions;

#[derive(Debug, Parser)]
#[command(
    name = "quoteflow",
    about = "QuoteFlow operator CLI",
    long_about = "Convert quote prices, inspect product form tables, translate quote messages, and run the quote submission workflow from the command line.",
    after_help = "Examples:\n  quoteflow convert 150\n  quoteflow fields Wig\n  quoteflow translate --to de \"Ships in two weeks\"\n  quoteflow doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a quoteflow.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Convert an RMB price to the USD estimate shown next to the price input")]
    Convert {
        #[arg(help = "Price in RMB")]
        price: String,
    },
    #[command(about = "List product series that have a form table")]
    Series,
    #[command(about = "Show the form field table for a product series")]
    Fields {
        #[arg(help = "Series name, e.g. Wig or Topper")]
        series: String,
    },
    #[command(about = "Translate text with the configured translation provider")]
    Translate(commands::translate::TranslateArgs),
    #[command(about = "Run the quote dialog workflow once against an in-memory quote book")]
    Quote(commands::quote::QuoteArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and translation credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

/// A config path given on the command line must exist; without one the
/// default locations are optional.
pub fn load_options(config_path: Option<PathBuf>) -> LoadOptions {
    LoadOptions {
        require_file: config_path.is_some(),
        config_path,
        ..LoadOptions::default()
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = load_options(cli.config);
    logging::init(&options);

    let result = match cli.command {
        Command::Convert { price } => commands::convert::run(&price),
        Command::Series => commands::fields::list_series(),
        Command::Fields { series } => commands::fields::run(&series),
        Command::Translate(args) => commands::translate::run(&options, &args),
        Command::Quote(args) => commands::quote::run(&options, &args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&options) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(&options, json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
