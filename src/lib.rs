//! request_gateway library: a client-side gateway for a remote HTTP API
//!
//! Requests submitted to a [`Gateway`] wait in a FIFO queue, are admitted up to
//! a concurrency limit, are answered from a local cache when allowed, and are
//! otherwise sent through a pluggable [`Transport`]. Every response runs
//! through a processor pipeline (content-type parsing plus an optional global
//! processor) before the caller's callback receives it.
//!
//! # Example
//!
//! ```no_run
//! use request_gateway::{Gateway, GatewayConfig};
//! use url::Url;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(GatewayConfig::new(Url::parse("https://api.example.com/v1")?))?;
//! gateway.resume();
//!
//! let response = gateway.execute(gateway.template(request_gateway::Method::Get, "/users")).await?;
//! if let Some(users) = response.parsed_body.as_ref().and_then(|body| body.as_json()) {
//!     println!("{} users", users.as_array().map_or(0, Vec::len));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Gateways capture the runtime they
//! are built on and run transports, processors and callbacks there.

pub mod cache;
pub mod config;
pub mod error_handling;
pub mod gateway;
pub mod initialization;
pub mod processor;
pub mod push;
pub mod queue;
pub mod request;
pub mod response;
pub mod transport;

// Re-export public API
pub use cache::{CacheStore, InMemoryCacheStore, NullCacheStore};
pub use config::{DefaultRequestProperties, GatewayConfig, LogFormat, LogLevel};
pub use error_handling::{
    GatewayError, GatewayEvent, GatewayStats, InitializationError, ProcessorError,
    TransportError, TransportErrorKind,
};
pub use gateway::{Gateway, GatewayBuilder, RequestCallback, RequestResult};
pub use processor::{
    CompoundResponseProcessor, ContentTypeDispatcher, JsonResponseProcessor,
    NullResponseProcessor, Processed, ProcessorFn, ResponseProcessor, TextResponseProcessor,
};
pub use push::{
    DefaultPushNotificationsProvider, PushNotifications, PushNotificationsProvider, Subscriber,
    Subscription,
};
pub use request::{
    DefaultFieldsRequestPreparer, Headers, IssuedRequest, Method, ParamValue, PreparerFn,
    QueryParameters, Request, RequestPreparer,
};
pub use response::{ParsedBody, Response};
pub use transport::{ReqwestTransport, Transport};
