//! Content-type dispatch.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use super::{Processed, ResponseProcessor};
use crate::config::CONTENT_TYPE_HEADER;
use crate::response::Response;

/// Delegates to the processor registered for a response's content type.
///
/// The content type is the request's override when set, otherwise the
/// response's `Content-Type` header. Matching is on the exact string; an
/// unregistered content type passes the response through unchanged.
#[derive(Default)]
pub struct ContentTypeDispatcher {
    processors: RwLock<HashMap<String, Arc<dyn ResponseProcessor>>>,
}

impl ContentTypeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `processor` for `content_type`, replacing any previous one.
    pub fn register(&self, content_type: impl Into<String>, processor: Arc<dyn ResponseProcessor>) {
        self.processors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(content_type.into(), processor);
    }

    pub fn unregister(&self, content_type: &str) -> Option<Arc<dyn ResponseProcessor>> {
        self.processors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(content_type)
    }

    pub fn processor_for(&self, content_type: &str) -> Option<Arc<dyn ResponseProcessor>> {
        self.processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(content_type)
            .cloned()
    }

    pub fn is_registered(&self, content_type: &str) -> bool {
        self.processor_for(content_type).is_some()
    }
}

fn content_type_of(response: &Response) -> Option<String> {
    response
        .request
        .request()
        .content_type_override
        .clone()
        .or_else(|| response.header(CONTENT_TYPE_HEADER).map(str::to_string))
}

#[async_trait]
impl ResponseProcessor for ContentTypeDispatcher {
    async fn process(&self, response: Response) -> Processed {
        let Some(content_type) = content_type_of(&response) else {
            return Processed::ok(response);
        };
        match self.processor_for(&content_type) {
            Some(processor) => {
                log::debug!("Dispatching {} response to registered parser", content_type);
                processor.process(response).await
            }
            None => Processed::ok(response),
        }
    }
}
