//! Command-line interface for hare-hounds.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hare and Hounds - REST game server with SQLite persistence
#[derive(Parser, Debug)]
#[command(name = "hare-hounds")]
#[command(about = "Hare and Hounds game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,

        /// Keep matches in memory only
        #[arg(long, conflicts_with = "db_path")]
        in_memory: bool,
    },

    /// Print a stored match
    Inspect {
        /// Match to print
        #[arg(long)]
        game_id: u64,

        /// Path to the database file
        #[arg(long)]
        db_path: Option<String>,
    },
}
