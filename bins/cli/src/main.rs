//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{SearchCommandInput, run_config_check, run_search};
use error::CliError;
use format::OutputArgs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sgw",
    version,
    about = "Hybrid search gateway CLI",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search request against the configured collaborators.
    Search {
        /// Gateway config file (JSON).
        #[arg(long)]
        config: PathBuf,
        /// Search request file (JSON, API v1 shape).
        #[arg(long)]
        request: PathBuf,
        /// Use a fixed zero embedding of this dimension instead of the
        /// configured embedding service (wiring checks without a backend).
        #[arg(long)]
        fixed_embedding_dim: Option<usize>,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Load and validate a config file, printing the normalized document.
    Check {
        /// Gateway config file (JSON).
        #[arg(long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let pretty = cli.output.pretty;

    let result: Result<(), CliError> = match cli.command {
        Commands::Search {
            config,
            request,
            fixed_embedding_dim,
        } => {
            run_search(SearchCommandInput {
                config,
                request,
                fixed_embedding_dim,
                pretty,
            })
            .await
        },
        Commands::Config {
            command: ConfigCommands::Check { config },
        } => run_config_check(&config, pretty),
    };

    if let Err(error) = result {
        eprintln!("{error}");
        std::process::exit(i32::from(error.exit_code().as_u8()));
    }
}
