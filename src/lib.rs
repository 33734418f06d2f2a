// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Warpcast Follow-Back Checker
//!
//! Finds the accounts a Farcaster user follows that do not follow them back,
//! split by whether those accounts have fewer or more than 10,000 followers.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Walks `v2/followers` and `v2/following` to exhaustion
//! - **Access Gate**: Requires the acting user to follow a configured account
//! - **Cancellation**: Any run can be abandoned between or during page requests
//! - **Session State**: Menu, loading, paging and share views for a front end
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use warpcast_followback::{AnalysisRequest, AppConfig, FollowBackAnalyzer, Threshold};
//!
//! #[tokio::main]
//! async fn main() -> warpcast_followback::Result<()> {
//!     let mut config = AppConfig::default();
//!     config.apply_env()?;
//!     config.validate()?;
//!
//!     let analyzer = FollowBackAnalyzer::new(Arc::new(config.build_fetcher()?));
//!     let request = AnalysisRequest::new(
//!         Threshold::Under10k,
//!         config.client_fid()?,
//!         config.required_fid,
//!     );
//!
//!     let outcome = analyzer.analyze(&request, &CancellationToken::new()).await?;
//!     if let Some(result) = outcome.into_result() {
//!         for user in &result.users {
//!             println!("{}", user.display_name());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │        CLI (under / above / share / serve)           │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────────────────────┴───────────────────────────┐
//! │   Session: mode, loading, results, list paging       │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────────────────────┴───────────────────────────┐
//! │ FollowBackAnalyzer: gate → followers → following → Δ │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────┬───────────────┴──────────┬────────────────┐
//! │   Auth   │           HTTP           │    Paginate    │
//! ├──────────┼──────────────────────────┼────────────────┤
//! │ Bearer   │ GET, Rate Limit, Timeout │ next.cursor    │
//! └──────────┴──────────────────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Bearer credentials
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Cursor pagination over the follow lists
pub mod pagination;

/// Follow-back analysis
pub mod analyzer;

/// View state for one user
pub mod session;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use analyzer::{
    AnalysisOutcome, AnalysisPhase, AnalysisRequest, AnalysisResult, FollowBackAnalyzer,
};
pub use config::AppConfig;
pub use pagination::{FollowGraph, FollowList, PagedFetcher};
pub use session::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
