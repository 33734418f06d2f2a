//! Authentication module
//!
//! The social-graph API takes a pre-obtained API key as a bearer token.
//! There is no login or refresh flow; the key arrives through configuration.

use crate::error::{Error, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

/// Bearer credential for the social-graph API
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap an API key, rejecting empty values
    pub fn bearer(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        // Header values cannot carry control characters
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::invalid_value("api_key", e.to_string()))?;
        Ok(Self { token })
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Apply the credential to a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(AUTHORIZATION, self.header_value())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}
