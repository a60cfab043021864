//! HTTP client module
//!
//! Thin transport used by remote store adapters.
//!
//! # Features
//!
//! - **Timeouts**: every request carries the client timeout
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status Classification**: non-2xx responses become `Error::HttpStatus`
//!
//! The client never retries. Retry timing belongs to whoever renders the
//! retry affordance.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
