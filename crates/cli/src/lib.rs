pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use turfquote_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "turfquote",
    about = "TurfQuote operator CLI",
    long_about = "Operate the TurfQuote catalog: migrations, demo seeds, quote pricing, lead scoring, config inspection, and readiness checks.",
    after_help = "Examples:\n  turfquote quote --service lawn-mowing --location maplewood --lot-size small\n  turfquote score --email jordan@example.com --tier better --frequency weekly --save\n  turfquote doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load and verify the deterministic demo catalog (idempotent)")]
    Seed,
    #[command(about = "Compute tier price ranges for a service, location, lot size, and month")]
    Quote(commands::quote::QuoteArgs),
    #[command(about = "Score a lead submission; --save persists it with status `new`")]
    Score(commands::score::ScoreArgs),
    #[command(about = "Inspect effective configuration values")]
    Config,
    #[command(about = "Validate config, database connectivity, and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn init_logging() {
    use tracing::Level;

    // Best-effort: a broken config still gets default logging so the
    // dispatched command can report the config error itself.
    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);
    let result = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // A second init (tests, embedding) is fine to ignore.
    let _ = result;
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Quote(args) => commands::quote::run(args),
        Command::Score(args) => commands::score::run(args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
