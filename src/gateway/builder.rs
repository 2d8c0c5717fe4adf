//! Gateway construction.

use std::sync::Arc;

use tokio::runtime::Handle;

use super::{CallbackContext, Gateway, GatewayInner};
use crate::cache::{CacheStore, InMemoryCacheStore};
use crate::config::{GatewayConfig, JSON_CONTENT_TYPE};
use crate::error_handling::{GatewayStats, InitializationError};
use crate::processor::{ContentTypeDispatcher, JsonResponseProcessor, ResponseProcessor};
use crate::push::{DefaultPushNotificationsProvider, PushNotificationsProvider};
use crate::queue::RequestQueue;
use crate::request::{GatewayId, RequestPreparer};
use crate::transport::{ReqwestTransport, Transport};

/// Configures the collaborators of a [`Gateway`].
///
/// Anything not set falls back to the reqwest transport, an in-memory cache
/// and the default push protocol. No content-type parsers are registered
/// unless added.
pub struct GatewayBuilder {
    config: GatewayConfig,
    transport: Option<Arc<dyn Transport>>,
    cache: Option<Arc<dyn CacheStore>>,
    preparer: Option<Arc<dyn RequestPreparer>>,
    response_processor: Option<Arc<dyn ResponseProcessor>>,
    parsers: Vec<(String, Arc<dyn ResponseProcessor>)>,
    push_provider: Option<Arc<dyn PushNotificationsProvider>>,
}

impl GatewayBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        GatewayBuilder {
            config,
            transport: None,
            cache: None,
            preparer: None,
            response_processor: None,
            parsers: Vec::new(),
            push_provider: None,
        }
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cache_store(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn push_provider(mut self, provider: Arc<dyn PushNotificationsProvider>) -> Self {
        self.push_provider = Some(provider);
        self
    }

    pub fn preparer(mut self, preparer: Arc<dyn RequestPreparer>) -> Self {
        self.preparer = Some(preparer);
        self
    }

    /// Processor run on every response after content-type parsing.
    pub fn response_processor(mut self, processor: Arc<dyn ResponseProcessor>) -> Self {
        self.response_processor = Some(processor);
        self
    }

    pub fn parser(
        mut self,
        content_type: impl Into<String>,
        processor: Arc<dyn ResponseProcessor>,
    ) -> Self {
        self.parsers.push((content_type.into(), processor));
        self
    }

    /// Registers [`JsonResponseProcessor`] for `application/json`.
    pub fn json(self) -> Self {
        self.parser(JSON_CONTENT_TYPE, Arc::new(JsonResponseProcessor))
    }

    /// Builds the gateway, capturing the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `NoRuntimeError` outside a runtime, or `HttpClientError` when
    /// the default transport cannot be built.
    pub fn build(self) -> Result<Gateway, InitializationError> {
        let runtime = Handle::try_current()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let cache: Arc<dyn CacheStore> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(InMemoryCacheStore::new()),
        };

        let push_provider: Arc<dyn PushNotificationsProvider> = match self.push_provider {
            Some(provider) => provider,
            None => Arc::new(DefaultPushNotificationsProvider),
        };

        let parsers = Arc::new(ContentTypeDispatcher::new());
        for (content_type, processor) in self.parsers {
            parsers.register(content_type, processor);
        }

        let id = GatewayId::next();
        let callbacks = CallbackContext::spawn(&runtime, id);
        log::debug!(
            "{}: created for {} (max {} active)",
            id,
            self.config.base_url,
            self.config.max_active_requests
        );

        Ok(Gateway {
            inner: Arc::new(GatewayInner {
                id,
                queue: RequestQueue::new(self.config.max_active_requests),
                config: self.config,
                transport,
                cache,
                preparer: self.preparer,
                response_processor: self.response_processor,
                parsers,
                push_provider,
                callbacks,
                runtime,
                stats: GatewayStats::new(),
            }),
        })
    }
}
