//! Response processors.
//!
//! A processor inspects a response and produces a new snapshot, possibly with
//! an error. Processors compose into a [`CompoundResponseProcessor`] pipeline
//! that stops at the first error, and a [`ContentTypeDispatcher`] routes a
//! response to the processor registered for its content type.

mod compound;
mod content_type;
mod decoders;

use std::future::Future;

use async_trait::async_trait;

use crate::error_handling::ProcessorError;
use crate::response::Response;

pub use compound::CompoundResponseProcessor;
pub use content_type::ContentTypeDispatcher;
pub use decoders::{JsonResponseProcessor, TextResponseProcessor};

/// Result of one processing stage.
///
/// The response is always present so that a failed stage can still hand back
/// the snapshot it was given.
#[derive(Debug)]
pub struct Processed {
    pub response: Response,
    pub error: Option<ProcessorError>,
}

impl Processed {
    pub fn ok(response: Response) -> Self {
        Processed {
            response,
            error: None,
        }
    }

    pub fn failed(response: Response, error: ProcessorError) -> Self {
        Processed {
            response,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// One stage of response processing.
///
/// Implementations may suspend for as long as they need; the pipeline awaits
/// each stage before starting the next.
#[async_trait]
pub trait ResponseProcessor: Send + Sync {
    async fn process(&self, response: Response) -> Processed;
}

/// Passes every response through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResponseProcessor;

#[async_trait]
impl ResponseProcessor for NullResponseProcessor {
    async fn process(&self, response: Response) -> Processed {
        Processed::ok(response)
    }
}

/// Adapts an async closure into a [`ResponseProcessor`].
///
/// ```no_run
/// use request_gateway::processor::{Processed, ProcessorFn};
///
/// let tag = ProcessorFn(|response: request_gateway::Response| async move {
///     Processed::ok(response.with_header("x-seen", "1"))
/// });
/// ```
pub struct ProcessorFn<F>(pub F);

#[async_trait]
impl<F, Fut> ResponseProcessor for ProcessorFn<F>
where
    F: Fn(Response) -> Fut + Send + Sync,
    Fut: Future<Output = Processed> + Send + 'static,
{
    async fn process(&self, response: Response) -> Processed {
        (self.0)(response).await
    }
}
