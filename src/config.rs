//! Application configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. an optional YAML or JSON file
//! 2. environment variables (`WARPCAST_API_KEY`, `WARPCAST_CLIENT_FID`,
//!    `WARPCAST_BASE_URL`)
//! 3. command-line flags
//!
//! The API key and the acting fid are pre-obtained; there is no login flow.

use crate::auth::Credential;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::pagination::{PagedFetcher, PaginationLimits, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::types::Fid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Fid of the account users must follow (0xbamse.eth)
pub const DEFAULT_REQUIRED_FID: Fid = 389_830;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "WARPCAST_API_KEY";
/// Environment variable holding the acting user's fid
pub const ENV_CLIENT_FID: &str = "WARPCAST_CLIENT_FID";
/// Environment variable overriding the API host
pub const ENV_BASE_URL: &str = "WARPCAST_BASE_URL";

/// Complete application configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Host of the social-graph API
    pub base_url: String,
    /// Bearer API key
    pub api_key: Option<String>,
    /// The user whose graph is inspected
    pub client_fid: Option<Fid>,
    /// Account that must be followed before analysing
    pub required_fid: Fid,
    /// Users per page request
    pub page_size: u32,
    /// Page requests allowed per list
    pub max_pages: usize,
    /// Users allowed per list
    pub max_records: Option<usize>,
    /// Per-request timeout; unset means none
    pub timeout_secs: Option<u64>,
    /// Client-side request pacing; unset means unlimited
    pub requests_per_second: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            client_fid: None,
            required_fid: DEFAULT_REQUIRED_FID,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_records: None,
            timeout_secs: None,
            requests_per_second: None,
        }
    }
}

impl AppConfig {
    /// Load a config file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(fid) = lookup(ENV_CLIENT_FID).filter(|v| !v.trim().is_empty()) {
            self.client_fid = Some(parse_fid(ENV_CLIENT_FID, &fid)?);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        Ok(())
    }

    /// Check the config is usable for an analysis
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }
        url::Url::parse(&self.base_url)
            .with_context(|| format!("base_url '{}' is not a valid URL", self.base_url))?;

        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(Error::missing_field("api_key"));
        }
        if self.client_fid.is_none() {
            return Err(Error::missing_field("client_fid"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_value("max_pages", "must be greater than 0"));
        }
        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// The acting user's fid
    pub fn client_fid(&self) -> Result<Fid> {
        self.client_fid
            .ok_or_else(|| Error::missing_field("client_fid"))
    }

    /// Bearer credential built from the API key
    pub fn credential(&self) -> Result<Credential> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::missing_field("api_key"))?;
        Credential::bearer(key)
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().base_url(&self.base_url);
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        builder.build()
    }

    /// Pagination limits
    pub fn limits(&self) -> PaginationLimits {
        let limits = PaginationLimits::default()
            .page_size(self.page_size)
            .max_pages(self.max_pages);
        match self.max_records {
            Some(max) => limits.max_records(max),
            None => limits,
        }
    }

    /// Build a fetcher from this config
    pub fn build_fetcher(&self) -> Result<PagedFetcher> {
        self.validate()?;
        let client = HttpClient::new(self.http_config(), self.credential()?)?;
        Ok(PagedFetcher::with_limits(client, self.limits()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("client_fid", &self.client_fid)
            .field("required_fid", &self.required_fid)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("max_records", &self.max_records)
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

fn parse_fid(field: &str, value: &str) -> Result<Fid> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::invalid_value(field, format!("'{value}' is not a fid: {e}")))
}
