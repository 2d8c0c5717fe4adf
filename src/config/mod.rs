//! Gateway configuration and constants.
//!
//! This module provides:
//! - Configuration constants (limits, timeouts, content types)
//! - Gateway configuration and per-verb request defaults
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    parse_header, parse_param, DefaultRequestProperties, GatewayConfig, LogFormat, LogLevel, Opt,
};
