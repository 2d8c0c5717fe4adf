//! Error handling and gateway statistics.
//!
//! This module provides:
//! - Error type definitions for transports, processors and the gateway
//! - Categorization of `reqwest` failures
//! - Per-event gateway statistics

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::{GatewayEvent, GatewayStats};
pub use types::{
    GatewayError, InitializationError, ProcessorError, TransportError, TransportErrorKind,
};
