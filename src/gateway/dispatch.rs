//! Admission, dispatch and completion.
//!
//! Draining pops every admissible request and starts one Tokio task per
//! request, so completing a request never recurses into the next dispatch.
//!
//! Panics raised by collaborators (cache store, transport, processors) are
//! caught here: the request still completes and releases its slot.

use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::FutureExt;

use crate::error_handling::{
    GatewayError, GatewayEvent, ProcessorError, TransportError, TransportErrorKind,
};
use crate::processor::{CompoundResponseProcessor, ResponseProcessor};
use crate::request::{IssuedRequest, Request};
use crate::response::Response;

use super::callbacks::panic_message;
use super::{Gateway, RequestResult};

impl Gateway {
    /// Dispatches pending requests while the gateway is running and below
    /// its concurrency limit.
    pub(crate) fn drain(&self) {
        while let Some(request) = self.inner.queue.next_admitted() {
            self.inner.stats.increment(GatewayEvent::Dispatched);
            log::debug!("{}: dispatching {}", self.inner.id, request);
            let gateway = self.clone();
            self.inner.runtime.spawn(async move {
                gateway.dispatch(request).await;
            });
        }
    }

    async fn dispatch(&self, request: IssuedRequest) {
        if request.request().allow_cached_response {
            let identifier = request.cache_identifier();
            let lookup = AssertUnwindSafe(self.inner.cache.get(&identifier))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    log::warn!(
                        "{}: cache lookup for {} panicked: {}",
                        self.inner.id,
                        identifier,
                        panic_message(payload.as_ref())
                    );
                    None
                });
            if let Some(cached) = lookup {
                self.inner.stats.increment(GatewayEvent::CacheHit);
                log::debug!("{}: cache hit for {}", self.inner.id, identifier);
                let response = cached.with_request(request.clone());
                self.complete(request, Some(response), None, true).await;
                return;
            }
            self.inner.stats.increment(GatewayEvent::CacheMiss);
            log::debug!("{}: cache miss for {}", self.inner.id, identifier);
        }
        let submitted = catch_unwind(AssertUnwindSafe(|| {
            self.inner.transport.submit(request.clone(), self.clone())
        }));
        if let Err(payload) = submitted {
            let message = format!("transport panicked: {}", panic_message(payload.as_ref()));
            log::warn!("{}: {} for {}", self.inner.id, message, request);
            let error = TransportError::new(TransportErrorKind::Other, message);
            self.complete(request, None, Some(error.into()), false).await;
        }
    }

    /// Reports the outcome of a dispatched request.
    ///
    /// Transports call this exactly once per request they were handed.
    /// Requests issued by another gateway are logged and ignored. Passing
    /// neither a response nor an error completes the request with
    /// [`GatewayError::ProtocolViolation`].
    pub fn fulfill_request(
        &self,
        request: IssuedRequest,
        response: Option<Response>,
        error: Option<TransportError>,
    ) {
        if !self.check_issued(&request) {
            return;
        }
        let gateway = self.clone();
        self.inner.runtime.spawn(async move {
            gateway
                .complete(request, response, error.map(GatewayError::from), false)
                .await;
        });
    }

    async fn complete(
        &self,
        request: IssuedRequest,
        response: Option<Response>,
        error: Option<GatewayError>,
        from_cache: bool,
    ) {
        let response = response.map(|response| response.with_retrieved_from_cache(from_cache));

        if let Some(error) = error {
            self.inner.stats.increment(GatewayEvent::TransportError);
            log::debug!("{}: {} failed: {}", self.inner.id, request, error);
            self.finish(request, response, Some(error));
            return;
        }

        let Some(response) = response else {
            self.inner.stats.increment(GatewayEvent::ProtocolViolation);
            log::warn!(
                "{}: transport returned neither a response nor an error for {}",
                self.inner.id,
                request
            );
            let error = GatewayError::ProtocolViolation {
                method: request.request().method,
                path: request.request().path.clone(),
            };
            self.finish(request, None, Some(error));
            return;
        };

        let pipeline = self.pipeline_for(request.request());
        let processed = match AssertUnwindSafe(pipeline.process(response))
            .catch_unwind()
            .await
        {
            Ok(processed) => processed,
            Err(payload) => {
                self.inner.stats.increment(GatewayEvent::ProcessorError);
                let message = panic_message(payload.as_ref()).to_string();
                log::warn!(
                    "{}: response processor panicked for {}: {}",
                    self.inner.id,
                    request,
                    message
                );
                let error = ProcessorError::Other(anyhow::anyhow!(
                    "response processor panicked: {}",
                    message
                ));
                self.finish(request, None, Some(error.into()));
                return;
            }
        };
        if let Some(error) = processed.error {
            self.inner.stats.increment(GatewayEvent::ProcessorError);
            log::debug!("{}: processing {} failed: {}", self.inner.id, request, error);
            self.finish(request, Some(processed.response), Some(error.into()));
            return;
        }

        let response = processed.response;
        let ttl = request.request().cache_response_with_expiration;
        if !response.retrieved_from_cache && ttl > 0 {
            let identifier = request.cache_identifier();
            let stored = catch_unwind(AssertUnwindSafe(|| {
                self.inner.cache.put(&identifier, response.clone(), ttl)
            }));
            match stored {
                Ok(()) => self.inner.stats.increment(GatewayEvent::CacheStore),
                Err(payload) => log::warn!(
                    "{}: cache store for {} panicked: {}",
                    self.inner.id,
                    identifier,
                    panic_message(payload.as_ref())
                ),
            }
        }

        self.finish(request, Some(response), None);
    }

    fn pipeline_for(&self, request: &Request) -> CompoundResponseProcessor {
        let mut pipeline = CompoundResponseProcessor::default();
        if request.apply_content_type_parsing {
            pipeline.push(self.inner.parsers.clone());
        }
        if let Some(processor) = &self.inner.response_processor {
            pipeline.push(processor.clone());
        }
        pipeline
    }

    fn finish(
        &self,
        request: IssuedRequest,
        response: Option<Response>,
        error: Option<GatewayError>,
    ) {
        self.inner.stats.increment(GatewayEvent::Completed);
        let result = RequestResult {
            request: request.clone(),
            response,
            error,
        };
        if !self.inner.queue.fulfill(&request, result) {
            log::debug!("{}: {} was not active", self.inner.id, request);
        }
        self.drain();
    }
}
