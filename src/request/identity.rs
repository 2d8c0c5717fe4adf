//! Request identity and gateway association.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::params::QueryParameters;
use super::{Method, Request};

static NEXT_GATEWAY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a gateway instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GatewayId(u64);

impl GatewayId {
    pub(crate) fn next() -> Self {
        GatewayId(NEXT_GATEWAY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GatewayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gateway-{}", self.0)
    }
}

/// The identity-relevant fields of a request.
///
/// Two requests with the same method, path and parameters are the same
/// request for queueing and cancellation, whatever their headers or body.
/// Absent and empty parameter maps are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: Method,
    path: String,
    params: QueryParameters,
}

impl RequestKey {
    pub(crate) fn new(method: Method, path: &str, params: Option<&QueryParameters>) -> Self {
        RequestKey {
            method,
            path: path.to_string(),
            params: params.cloned().unwrap_or_default(),
        }
    }
}

/// A request descriptor associated with the gateway that issued it.
///
/// Transports receive `IssuedRequest`s and hand them back to
/// [`Gateway::fulfill_request`](crate::Gateway::fulfill_request); a gateway
/// ignores requests it did not issue.
///
/// Every call to [`Gateway::submit`](crate::Gateway::submit) yields a handle
/// with its own sequence number, so completions are routed to the submission
/// that produced them even when several identical requests are active.
#[derive(Debug, Clone)]
pub struct IssuedRequest {
    gateway: GatewayId,
    sequence: u64,
    request: Arc<Request>,
}

impl IssuedRequest {
    pub(crate) fn new(gateway: GatewayId, request: Request) -> Self {
        IssuedRequest {
            gateway,
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            request: Arc::new(request),
        }
    }

    pub(crate) fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The gateway that issued this request.
    pub fn gateway_id(&self) -> GatewayId {
        self.gateway
    }

    /// The underlying request descriptor.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the descriptor, cloning only if it is shared.
    pub fn into_request(self) -> Request {
        Arc::try_unwrap(self.request).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Identity key, see [`RequestKey`].
    pub fn key(&self) -> RequestKey {
        self.request.key()
    }

    pub fn cache_identifier(&self) -> String {
        self.request.cache_identifier()
    }

    pub(crate) fn is_issued_by(&self, gateway: GatewayId) -> bool {
        self.gateway == gateway
    }
}

/// Equality follows the coarse request identity, scoped to the issuing gateway.
impl PartialEq for IssuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.gateway == other.gateway && self.key() == other.key()
    }
}

impl Eq for IssuedRequest {}

impl fmt::Display for IssuedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.request.method, self.request.path)
    }
}

/// Anything a gateway can accept as a request.
///
/// Plain descriptors are wrapped; requests already issued by the same gateway
/// pass through unchanged and requests issued elsewhere are re-associated.
pub trait IntoIssuedRequest {
    fn into_issued(self, gateway: GatewayId) -> IssuedRequest;
}

impl IntoIssuedRequest for Request {
    fn into_issued(self, gateway: GatewayId) -> IssuedRequest {
        IssuedRequest::new(gateway, self)
    }
}

impl IntoIssuedRequest for IssuedRequest {
    fn into_issued(self, gateway: GatewayId) -> IssuedRequest {
        if self.is_issued_by(gateway) {
            self
        } else {
            IssuedRequest {
                gateway,
                sequence: self.sequence,
                request: self.request,
            }
        }
    }
}
