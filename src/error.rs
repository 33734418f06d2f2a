//! Error types for the follow-back checker
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::config::DEFAULT_REQUIRED_FID;
use crate::types::Fid;
use thiserror::Error;

/// The main error type
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Pagination stopped after {limit} {kind}")]
    PaginationLimitExceeded { limit: usize, kind: LimitKind },

    // ============================================================================
    // Analysis Errors
    // ============================================================================
    #[error("Fid {required_fid} is not followed by the acting user")]
    GateNotSatisfied { required_fid: Fid },

    #[error("Fid {fid} has no followers")]
    NoFollowers { fid: Fid },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("An analysis is already running")]
    AnalysisInProgress,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Which pagination cap was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Too many page requests
    Pages,
    /// Too many accumulated records
    Records,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitKind::Pages => write!(f, "pages"),
            LimitKind::Records => write!(f, "records"),
        }
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// True for failures of the remote fetch itself (transport, status, body)
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Decode { .. } | Error::InvalidUrl(_)
        )
    }

    /// True if the run ended because it was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Message shown to the person using the checker.
    ///
    /// Every kind maps to its own wording so that the presentation layer
    /// never has to inspect the variant.
    pub fn user_message(&self) -> String {
        match self {
            Error::GateNotSatisfied { required_fid } => {
                format!(
                    "Please follow {} first to use this frame.",
                    gate_account_name(*required_fid)
                )
            }
            Error::NoFollowers { .. } => {
                "You have no followers. Please follow some accounts first.".to_string()
            }
            Error::Cancelled => "Analysis cancelled.".to_string(),
            Error::AnalysisInProgress => {
                "Please wait, an analysis is already running.".to_string()
            }
            Error::HttpStatus { body, .. } => {
                format!("An error occurred: Failed to fetch data: {body}")
            }
            Error::Http(e) => format!("An error occurred: Failed to fetch data: {e}"),
            Error::PaginationLimitExceeded { .. } => {
                format!("An error occurred: {self}. Your follow graph is too large to scan.")
            }
            other => format!("An error occurred: {other}"),
        }
    }
}

/// Display name of the default gate account
pub const REQUIRED_ACCOUNT_NAME: &str = "0xbamse.eth";

/// How a gate account is named to users; only the default one has a known name
pub fn gate_account_name(fid: Fid) -> String {
    if fid == DEFAULT_REQUIRED_FID {
        REQUIRED_ACCOUNT_NAME.to_string()
    } else {
        format!("fid {fid}")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
