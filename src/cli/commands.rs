//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Find the Warpcast accounts you follow that don't follow you back
#[derive(Parser, Debug)]
#[command(name = "followback")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides WARPCAST_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Your fid (overrides WARPCAST_CLIENT_FID)
    #[arg(long, global = true)]
    pub fid: Option<u64>,

    /// API host (overrides WARPCAST_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Maximum page requests per list
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Accounts under 10k followers that don't follow you back
    Under {
        /// Result page to show (10 per page)
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Accounts with 10k+ followers that don't follow you back
    Above {
        /// Result page to show (10 per page)
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Print the share link
    Share,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON snapshot of the view
    Json,
    /// Human-readable output
    Pretty,
}
