//! Request preparers.
//!
//! A preparer rewrites each request synchronously before it is queued:
//! injecting default headers or parameters, rewriting paths, serialising
//! bodies.

use super::params::{Headers, ParamValue, QueryParameters};
use super::Request;

/// Hook applied to every submitted request before it enters the queue.
pub trait RequestPreparer: Send + Sync {
    fn prepare(&self, request: Request) -> Request;
}

/// Infills default headers and query parameters.
///
/// Values already present on a request are never overridden.
#[derive(Debug, Clone, Default)]
pub struct DefaultFieldsRequestPreparer {
    headers: Headers,
    params: QueryParameters,
}

impl DefaultFieldsRequestPreparer {
    pub fn new(headers: Headers, params: QueryParameters) -> Self {
        DefaultFieldsRequestPreparer { headers, params }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl RequestPreparer for DefaultFieldsRequestPreparer {
    fn prepare(&self, mut request: Request) -> Request {
        if self.headers.is_empty() && self.params.is_empty() {
            return request;
        }

        for (name, value) in &self.headers {
            if request.header(name).is_none() {
                request
                    .headers
                    .get_or_insert_with(Headers::new)
                    .insert(name.clone(), value.clone());
            }
        }

        for (key, value) in &self.params {
            let params = request.params.get_or_insert_with(QueryParameters::new);
            params.entry(key.clone()).or_insert_with(|| value.clone());
        }

        request
    }
}

/// Adapts a closure into a [`RequestPreparer`].
pub struct PreparerFn<F>(pub F);

impl<F> RequestPreparer for PreparerFn<F>
where
    F: Fn(Request) -> Request + Send + Sync,
{
    fn prepare(&self, request: Request) -> Request {
        (self.0)(request)
    }
}
