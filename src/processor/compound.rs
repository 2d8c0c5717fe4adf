//! Sequential processor pipeline.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Processed, ResponseProcessor};
use crate::response::Response;

/// Runs processors in registration order, stopping at the first error.
///
/// Processors after a failing stage are never invoked; the result carries the
/// snapshot returned by the failing stage together with its error.
#[derive(Clone, Default)]
pub struct CompoundResponseProcessor {
    processors: Vec<Arc<dyn ResponseProcessor>>,
}

impl CompoundResponseProcessor {
    pub fn new(processors: Vec<Arc<dyn ResponseProcessor>>) -> Self {
        CompoundResponseProcessor { processors }
    }

    pub fn push(&mut self, processor: Arc<dyn ResponseProcessor>) {
        self.processors.push(processor);
    }

    pub fn with(mut self, processor: Arc<dyn ResponseProcessor>) -> Self {
        self.push(processor);
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

#[async_trait]
impl ResponseProcessor for CompoundResponseProcessor {
    async fn process(&self, response: Response) -> Processed {
        let mut current = response;
        for (stage, processor) in self.processors.iter().enumerate() {
            let processed = processor.process(current).await;
            current = processed.response;
            if let Some(error) = processed.error {
                log::debug!("Processor stage {} failed: {}", stage, error);
                return Processed::failed(current, error);
            }
        }
        Processed::ok(current)
    }
}
