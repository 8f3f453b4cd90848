use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "dojo", version, about = "Dojo practice session CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a practice session from a program file
    Practice {
        /// Program file (.toml or .json)
        program: PathBuf,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Inspect program files
    Program {
        #[command(subcommand)]
        action: commands::program::ProgramAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, filtered by `DOJO_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("DOJO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Practice { program, json } => commands::practice::run(&program, json),
        Commands::Program { action } => commands::program::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
