//! Response snapshots.
//!
//! A [`Response`] is immutable once built: each pipeline stage that changes a
//! response produces a new copy through the `with_*` methods.

use url::Url;

use crate::request::{Headers, IssuedRequest};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    Json(serde_json::Value),
    Text(String),
}

impl ParsedBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            ParsedBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParsedBody::Text(text) => Some(text),
            ParsedBody::Json(_) => None,
        }
    }
}

/// Outcome of one request as seen by the pipeline and the caller.
#[derive(Debug, Clone)]
pub struct Response {
    /// The request this response answers
    pub request: IssuedRequest,

    /// The absolute URL that was requested
    pub requested_url: Url,

    /// The final URL after redirects, if known
    pub resolved_url: Option<Url>,

    /// HTTP status code
    pub status_code: u16,

    /// Response headers
    pub headers: Headers,

    /// Raw body bytes
    pub body: Option<Vec<u8>>,

    /// Body decoded by a content processor
    pub parsed_body: Option<ParsedBody>,

    /// Whether the response came from the cache rather than the transport
    pub retrieved_from_cache: bool,
}

impl Response {
    pub fn new(request: IssuedRequest, requested_url: Url, status_code: u16) -> Self {
        Response {
            request,
            requested_url,
            resolved_url: None,
            status_code,
            headers: Headers::new(),
            body: None,
            parsed_body: None,
            retrieved_from_cache: false,
        }
    }

    /// Value of a header, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn with_request(mut self, request: IssuedRequest) -> Self {
        self.request = request;
        self
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_resolved_url(mut self, url: Option<Url>) -> Self {
        self.resolved_url = url;
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }

    pub fn with_parsed_body(mut self, parsed_body: Option<ParsedBody>) -> Self {
        self.parsed_body = parsed_body;
        self
    }

    pub fn with_retrieved_from_cache(mut self, from_cache: bool) -> Self {
        self.retrieved_from_cache = from_cache;
        self
    }
}
