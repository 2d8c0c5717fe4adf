//! Transports.
//!
//! A transport performs the network exchange for a dispatched request and
//! reports the outcome back to the gateway that dispatched it.

mod http;

use crate::gateway::Gateway;
use crate::request::IssuedRequest;

pub use http::ReqwestTransport;

/// Performs requests on behalf of a gateway.
///
/// `submit` must not block. For every request it receives, an implementation
/// must eventually call [`Gateway::fulfill_request`] exactly once with the
/// same `IssuedRequest`, passing a response, an error, or both.
pub trait Transport: Send + Sync {
    fn submit(&self, request: IssuedRequest, gateway: Gateway);
}
