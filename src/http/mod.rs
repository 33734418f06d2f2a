//! HTTP client module
//!
//! Provides the single-attempt client used to talk to the social-graph API.
//!
//! # Features
//!
//! - **Bearer Auth**: every request carries the configured credential
//! - **Rate Limiting**: optional token bucket rate limiter using governor
//! - **Error Classification**: status, transport and decode failures

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
