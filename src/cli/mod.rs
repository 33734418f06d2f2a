//! CLI module
//!
//! Command-line interface for the follow-back checker.
//!
//! # Commands
//!
//! - `under` - Accounts under 10k followers that don't follow back
//! - `above` - Accounts with 10k+ followers that don't follow back
//! - `share` - Print the share link
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{render_pretty, Runner};
pub use server::{serve, ServerConfig};
