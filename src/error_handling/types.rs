//! Error type definitions.
//!
//! This module defines all error types produced by the gateway, its transports
//! and its response processors.

use std::string::FromUtf8Error;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::request::Method;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// A gateway was built outside a Tokio runtime.
    #[error("No Tokio runtime available: {0}")]
    NoRuntimeError(#[from] tokio::runtime::TryCurrentError),
}

/// Classes of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum TransportErrorKind {
    Builder,
    InvalidUrl,
    Redirect,
    Timeout,
    Connect,
    Request,
    Body,
    BodyTooLarge,
    Decode,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Builder => "HTTP request builder error",
            TransportErrorKind::InvalidUrl => "Invalid request URL",
            TransportErrorKind::Redirect => "HTTP request redirect error",
            TransportErrorKind::Timeout => "HTTP request timeout error",
            TransportErrorKind::Connect => "HTTP request connect error",
            TransportErrorKind::Request => "HTTP request error",
            TransportErrorKind::Body => "HTTP response body error",
            TransportErrorKind::BodyTooLarge => "HTTP response body too large",
            TransportErrorKind::Decode => "HTTP response decode error",
            TransportErrorKind::Other => "HTTP request other error",
        }
    }
}

/// A failure reported by a transport instead of a response.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        TransportError {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl From<ReqwestError> for TransportError {
    fn from(error: ReqwestError) -> Self {
        let kind = crate::error_handling::categorize_reqwest_error(&error);
        TransportError::new(kind, error.to_string()).with_source(error)
    }
}

/// A failure reported by a response processor.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// The body is not valid JSON.
    #[error("Failed to decode {content_type} body: {source}")]
    Decode {
        content_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body is not valid UTF-8.
    #[error("Failed to decode {content_type} body as text: {source}")]
    InvalidText {
        content_type: String,
        #[source]
        source: FromUtf8Error,
    },

    /// A processor refused the response.
    #[error("Response rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error delivered to a request's completion callback.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The transport reported neither a response nor an error.
    #[error("Transport returned neither a response nor an error for {method} {path}")]
    ProtocolViolation { method: Method, path: String },

    #[error("Response processing failed: {0}")]
    Processor(#[from] ProcessorError),

    /// The request was cancelled before it was dispatched.
    #[error("Request cancelled")]
    Cancelled,
}
