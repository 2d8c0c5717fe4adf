//! Gateway core.
//!
//! A [`Gateway`] accepts requests, queues them, admits them up to a
//! concurrency limit, answers them from the cache or hands them to a
//! transport, runs the response pipeline and delivers the outcome to the
//! caller's callback on the gateway's callback context.
//!
//! Gateways start paused: submitted requests wait in the queue until
//! [`Gateway::resume`] is called.

mod builder;
mod callbacks;
mod dispatch;
mod methods;

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use url::Url;

use crate::cache::CacheStore;
use crate::config::GatewayConfig;
use crate::error_handling::{GatewayError, GatewayEvent, GatewayStats, InitializationError};
use crate::processor::{ContentTypeDispatcher, ResponseProcessor};
use crate::push::{PushNotifications, PushNotificationsProvider};
use crate::queue::RequestQueue;
use crate::request::{GatewayId, IntoIssuedRequest, IssuedRequest, RequestPreparer};
use crate::response::Response;
use crate::transport::Transport;

pub use builder::GatewayBuilder;
use callbacks::CallbackContext;

/// Outcome of one request, as delivered to its callback.
///
/// A response may accompany an error when a processor fails after earlier
/// stages succeeded.
#[derive(Debug)]
pub struct RequestResult {
    pub request: IssuedRequest,
    pub response: Option<Response>,
    pub error: Option<GatewayError>,
}

impl RequestResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into the response, or the error that replaced it.
    pub fn into_response(self) -> Result<Response, GatewayError> {
        match (self.error, self.response) {
            (Some(error), _) => Err(error),
            (None, Some(response)) => Ok(response),
            (None, None) => Err(GatewayError::ProtocolViolation {
                method: self.request.request().method,
                path: self.request.request().path.clone(),
            }),
        }
    }
}

/// Completion callback for a submitted request. Invoked exactly once unless
/// the gateway shuts down first.
pub type RequestCallback = Box<dyn FnOnce(RequestResult) + Send + 'static>;

pub(crate) struct GatewayInner {
    id: GatewayId,
    config: GatewayConfig,
    queue: RequestQueue,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheStore>,
    preparer: Option<Arc<dyn RequestPreparer>>,
    response_processor: Option<Arc<dyn ResponseProcessor>>,
    parsers: Arc<ContentTypeDispatcher>,
    push_provider: Arc<dyn PushNotificationsProvider>,
    callbacks: CallbackContext,
    runtime: Handle,
    stats: GatewayStats,
}

/// Handle to a request gateway. Clones share the same gateway.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("id", &self.inner.id)
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("paused", &self.is_paused())
            .field("pending", &self.pending_count())
            .field("active", &self.active_count())
            .finish()
    }
}

impl Gateway {
    /// Builds a gateway with the reqwest transport, an in-memory cache and a
    /// JSON parser for `application/json`.
    ///
    /// # Errors
    ///
    /// Fails when called outside a Tokio runtime or when the HTTP client
    /// cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, InitializationError> {
        Self::builder(config).json().build()
    }

    pub fn builder(config: GatewayConfig) -> GatewayBuilder {
        GatewayBuilder::new(config)
    }

    pub fn id(&self) -> GatewayId {
        self.inner.id
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.config.base_url
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn stats(&self) -> &GatewayStats {
        &self.inner.stats
    }

    /// Associates `request` with this gateway without submitting it.
    pub fn internalize_request(&self, request: impl IntoIssuedRequest) -> IssuedRequest {
        request.into_issued(self.inner.id)
    }

    /// Queues a request and returns the handle it was queued under.
    ///
    /// The preparer, if any, runs before the request is queued. `callback`
    /// runs on the gateway's callback context once the request completes or
    /// is cancelled.
    pub fn submit<F>(&self, request: impl IntoIssuedRequest, callback: F) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        let mut issued = self.internalize_request(request);
        if let Some(preparer) = &self.inner.preparer {
            issued = IssuedRequest::new(self.inner.id, preparer.prepare(issued.into_request()));
        }

        self.inner.stats.increment(GatewayEvent::Submitted);
        log::debug!("{}: queued {}", self.inner.id, issued);
        self.inner
            .queue
            .append(issued.clone(), self.inner.callbacks.wrap(Box::new(callback)));
        self.drain();
        issued
    }

    /// Submits a request and waits for its outcome.
    ///
    /// A cancelled request yields [`GatewayError::Cancelled`].
    pub async fn execute(&self, request: impl IntoIssuedRequest) -> Result<Response, GatewayError> {
        let (sender, receiver) = oneshot::channel();
        self.submit(request, move |result| {
            let _ = sender.send(result);
        });
        match receiver.await {
            Ok(result) => result.into_response(),
            Err(_) => Err(GatewayError::Cancelled),
        }
    }

    /// Stops admitting requests. Active requests run to completion.
    pub fn pause(&self) {
        self.inner.queue.pause();
        log::info!("{}: paused", self.inner.id);
    }

    /// Starts admitting requests, up to the concurrency limit.
    pub fn resume(&self) {
        if self.inner.queue.resume() {
            log::info!("{}: resumed", self.inner.id);
        }
        self.drain();
    }

    pub fn is_paused(&self) -> bool {
        self.inner.queue.is_paused()
    }

    pub fn max_active_requests(&self) -> usize {
        self.inner.queue.max_active()
    }

    /// Changes the concurrency limit. Raising it admits waiting requests
    /// immediately; lowering it never interrupts active ones.
    pub fn set_max_active_requests(&self, max_active: usize) {
        self.inner.queue.set_max_active(max_active);
        self.drain();
    }

    /// Snapshot of the requests waiting to be admitted, in FIFO order.
    pub fn pending_requests(&self) -> Vec<IssuedRequest> {
        self.inner.queue.pending_requests()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.queue.number_pending()
    }

    pub fn active_count(&self) -> usize {
        self.inner.queue.number_active()
    }

    /// Cancels a pending request.
    ///
    /// Its callback receives [`GatewayError::Cancelled`] and neither the cache
    /// nor the transport sees it. Returns `false` for active, unknown and
    /// foreign requests.
    pub fn cancel_request(&self, request: &IssuedRequest) -> bool {
        if !self.check_issued(request) {
            return false;
        }
        let cancelled = self.inner.queue.cancel(request);
        if cancelled {
            self.inner.stats.increment(GatewayEvent::Cancelled);
            log::debug!("{}: cancelled {}", self.inner.id, request);
        }
        cancelled
    }

    /// Registers (`Some`) or removes (`None`) the parser for a content type.
    pub fn set_parser(
        &self,
        content_type: impl Into<String>,
        processor: Option<Arc<dyn ResponseProcessor>>,
    ) {
        let content_type = content_type.into();
        match processor {
            Some(processor) => self.inner.parsers.register(content_type, processor),
            None => {
                self.inner.parsers.unregister(&content_type);
            }
        }
    }

    /// Push notification methods, submitted through this gateway.
    pub fn push_notifications(&self) -> PushNotifications<'_> {
        PushNotifications::new(self, self.inner.push_provider.clone())
    }

    /// Rejects requests issued by another gateway.
    fn check_issued(&self, request: &IssuedRequest) -> bool {
        if request.is_issued_by(self.inner.id) {
            return true;
        }
        self.inner.stats.increment(GatewayEvent::ForeignRequest);
        log::warn!(
            "{}: ignoring {} issued by {}",
            self.inner.id,
            request,
            request.gateway_id()
        );
        false
    }
}
