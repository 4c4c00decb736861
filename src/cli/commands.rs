//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codex")]
#[command(about = "Personal codex: finances, carpentry estimates and a journal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Codex home directory (default: $CODEX_HOME, then the current directory)
    #[arg(long, global = true, env = "CODEX_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web UI
    Serve {
        /// Address to bind (default: server.host from config.json)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: server.port from config.json)
        #[arg(short, long, env = "CODEX_PORT")]
        port: Option<u16>,
    },

    /// Initialize a new codex
    Init {
        /// Directory to initialize (default: the codex home)
        path: Option<PathBuf>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set, e.g. user.currency
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Show record counts
    Stats,

    /// Quick lumber calculation
    Calc {
        /// Lumber key, e.g. 2x4x8 or plywood_3/4
        lumber: String,

        /// Pieces needed before waste
        quantity: u32,

        /// Waste allowance in percent (0-30; default from config.json)
        #[arg(short, long)]
        waste: Option<u32>,

        /// Save the calculation to the codex
        #[arg(long)]
        save: bool,
    },

    /// Export all data as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
