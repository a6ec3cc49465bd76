//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Quicklink - URL shortener service
#[derive(Parser)]
#[command(name = "quicklink")]
#[command(version)]
#[command(about = "URL shortener with a cache-aside redirect path", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Connect to the store and cache, print a health report and exit
    Check,
}
