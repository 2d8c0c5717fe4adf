//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients with proper
//! configuration for requests and redirect handling.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{GatewayConfig, MAX_REDIRECT_HOPS};
use crate::error_handling::InitializationError;

fn builder(config: &GatewayConfig) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
}

/// Initializes the HTTP client used for requests that follow redirects.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the gateway config
/// - Timeout from the gateway config
/// - Redirect following enabled (up to `MAX_REDIRECT_HOPS` hops)
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &GatewayConfig) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = builder(config)
        .redirect(Policy::limited(MAX_REDIRECT_HOPS))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the HTTP client used for requests that must not follow
/// redirects.
///
/// A 3xx answer from this client is delivered as the response itself.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_redirect_client(
    config: &GatewayConfig,
) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = builder(config).redirect(Policy::none()).build()?;
    Ok(Arc::new(client))
}
