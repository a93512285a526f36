//! deSEC CLI
//!
//! Command-line client for syncing DNS zones with deSEC.
//!
//! # Commands
//!
//! - `dump` - Read a zone from the API and print its records
//! - `apply` - Apply a plan file in one bulk update
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use commands::ConnectOptions;
use desec_sync_engine::DEFAULT_BASE_URL;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// deSEC zone sync tools.
#[derive(Parser, Debug)]
#[command(name = "desec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API token
    #[arg(global = true, long, env = "DESEC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API base URL
    #[arg(global = true, long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Retries after a failed request
    #[arg(global = true, long, default_value = "5")]
    max_retries: u32,

    /// Delay before the first retry, doubled on every further retry
    #[arg(global = true, long, default_value = "2")]
    initial_backoff_secs: u64,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a zone and print its records
    Dump {
        /// Zone name, e.g. example.com.
        zone: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Apply a plan file
    Apply {
        /// Path to the plan JSON file
        plan: PathBuf,

        /// Print the update batch without sending it
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            max_retries: self.max_retries,
            initial_backoff_secs: self.initial_backoff_secs,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.connect_options();
    match cli.command {
        Commands::Dump { zone, format } => {
            commands::dump::run(&options, &zone, &format)?;
        }
        Commands::Apply { plan, dry_run } => {
            commands::apply::run(&options, &plan, dry_run)?;
        }
        Commands::Version => {
            println!("deSEC CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
