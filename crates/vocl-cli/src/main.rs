//! vocl - stream live audio from an input device to an output device with a
//! per-channel echo.

mod commands;
mod prompt;
mod settings;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vocl")]
#[command(author, version, about = "VOCL - Voice Over Command Line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display audio device information
    Info(commands::info::InfoArgs),

    /// Stream input to output through an echo effect
    Run(commands::run::RunArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => commands::info::run(&args),
        Commands::Run(args) => commands::run::run(args),
    }
}
