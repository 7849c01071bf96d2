use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    analyze::{self, AnalyzeArgs},
    generate::{self, GenerateArgs},
    launch::{self, LaunchArgs},
    secrets::{self, SecretsArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "kgr", about = "Kangaroo parameter sweep tooling")]
struct Cli {
    /// Log verbosity (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate a sweep, assign tables and write the configuration sequence.
    Generate(GenerateArgs),
    /// Run the search binary once per record of a configuration sequence.
    Launch(LaunchArgs),
    /// Write a file of uniformly random secrets.
    Secrets(SecretsArgs),
    /// Rank run logs by their reported total time.
    Analyze(AnalyzeArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Launch(args) => launch::run(&args),
        Command::Secrets(args) => secrets::run(&args),
        Command::Analyze(args) => analyze::run(&args),
    }
}
