//! Invoicer CLI.
//!
//! ```bash
//! invoicer hash-password 'correct horse'
//! invoicer check-config --config invoicer.toml
//! invoicer serve --config invoicer.toml --port 8080
//! ```
//!
//! See `invoicer --help` for all available commands and options.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "invoicer", about = "Invoice dashboard server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file (missing file means defaults + environment)
        #[arg(long, default_value = invoicer_core::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Override [server].host
        #[arg(long)]
        host: Option<String>,

        /// Override [server].port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print an Argon2id hash for a [[users]] entry
    HashPassword {
        password: String,
    },

    /// Load and validate the configuration
    CheckConfig {
        #[arg(long, default_value = invoicer_core::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config, host, port } => commands::serve::run(&config, host, port).await,
        Commands::HashPassword { password } => {
            commands::hash_password::run(&password).map(|hash| println!("{}", hash))
        }
        Commands::CheckConfig { config } => {
            commands::check_config::run(&config).map(|report| println!("{}", report))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
