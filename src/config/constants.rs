//! Configuration constants.
//!
//! This module defines the constants used throughout the gateway, including
//! concurrency limits, cache lifetimes, timeouts and size limits.

/// Maximum number of requests dispatched at the same time by one gateway.
pub const DEFAULT_MAX_ACTIVE_REQUESTS: usize = 2;

/// Default cache lifetime for GET responses, in seconds (5 minutes).
pub const DEFAULT_CACHE_EXPIRATION_SECS: u64 = 300;

/// Per-request timeout applied by the HTTP transport, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

// Response size limits
/// Maximum response body size in bytes (8MB)
/// Responses larger than this are reported as transport errors to prevent memory exhaustion
pub const MAX_RESPONSE_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Default User-Agent string sent by the HTTP transport.
pub const DEFAULT_USER_AGENT: &str = concat!("request_gateway/", env!("CARGO_PKG_VERSION"));

/// Header consulted by the content-type dispatcher.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Content type handled by the JSON response processor.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type handled by the text response processor.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";
