//! Per-verb convenience methods.

use crate::request::{IssuedRequest, Method, Request};

use super::{Gateway, RequestResult};

impl Gateway {
    /// A request for `path` built from the configured template for `method`.
    pub fn template(&self, method: Method, path: impl Into<String>) -> Request {
        self.inner
            .config
            .default_request_properties
            .template(method, path)
    }

    pub fn get<F>(&self, path: impl Into<String>, callback: F) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        self.submit(self.template(Method::Get, path), callback)
    }

    pub fn post<F>(&self, path: impl Into<String>, body: Option<Vec<u8>>, callback: F) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        self.submit(self.template(Method::Post, path).with_body(body), callback)
    }

    pub fn put<F>(&self, path: impl Into<String>, body: Option<Vec<u8>>, callback: F) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        self.submit(self.template(Method::Put, path).with_body(body), callback)
    }

    pub fn delete<F>(&self, path: impl Into<String>, callback: F) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        self.submit(self.template(Method::Delete, path), callback)
    }
}
