//! Request descriptors.
//!
//! A [`Request`] is a plain value describing one HTTP exchange with the remote
//! gateway: method, path, query parameters, headers and body, plus the flags
//! that steer caching and response parsing. Requests are never mutated once
//! submitted; the `with_*` methods return modified copies.

mod identity;
mod location;
mod params;
mod preparer;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub use identity::{GatewayId, IntoIssuedRequest, IssuedRequest, RequestKey};
pub use params::{Headers, ParamValue, QueryParameters};
pub use preparer::{DefaultFieldsRequestPreparer, PreparerFn, RequestPreparer};

use params::canonical_query;

/// HTTP verb.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

/// Description of a request to send to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// The HTTP verb to use
    pub method: Method,

    /// The path to request, relative to the gateway's base URL
    pub path: String,

    /// Query string parameters to append to the path
    pub params: Option<QueryParameters>,

    /// HTTP headers to send with the request
    pub headers: Option<Headers>,

    /// Body data to send with the request
    pub body: Option<Vec<u8>>,

    /// Whether HTTP redirects are followed before the response is handled
    pub follow_redirects: bool,

    /// Whether the content-type dispatcher runs on the response
    pub apply_content_type_parsing: bool,

    /// Content type to assume for the response, ignoring its headers
    pub content_type_override: Option<String>,

    /// Whether a cached response may satisfy this request
    pub allow_cached_response: bool,

    /// Seconds to keep the response in the cache (0 = do not store)
    pub cache_response_with_expiration: u64,

    /// Cache key to use instead of the derived one
    pub custom_cache_identifier: Option<String>,
}

impl Request {
    /// Creates a request that follows redirects, parses by content type and
    /// neither reads nor writes the cache.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            params: None,
            headers: None,
            body: None,
            follow_redirects: true,
            apply_content_type_parsing: true,
            content_type_override: None,
            allow_cached_response: false,
            cache_response_with_expiration: 0,
            custom_cache_identifier: None,
        }
    }

    /// Key used to store and look up this request's response in the cache.
    ///
    /// Unless a custom identifier is set, it depends only on the method, path
    /// and parameters.
    pub fn cache_identifier(&self) -> String {
        match &self.custom_cache_identifier {
            Some(identifier) => identifier.clone(),
            None => format!(
                "{} {}?{}",
                self.method,
                self.path,
                canonical_query(self.params.as_ref())
            ),
        }
    }

    /// Identity of this request for queue lookups and cancellation.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method, &self.path, self.params.as_ref())
    }

    /// Value of a header, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_params(mut self, params: Option<QueryParameters>) -> Self {
        self.params = params;
        self
    }

    /// Returns a copy with one query parameter set.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params
            .get_or_insert_with(QueryParameters::new)
            .insert(key.into(), value.into());
        self
    }

    /// Returns a copy with one query parameter removed.
    pub fn without_param(mut self, key: &str) -> Self {
        if let Some(params) = self.params.as_mut() {
            params.remove(key);
        }
        self
    }

    pub fn with_headers(mut self, headers: Option<Headers>) -> Self {
        self.headers = headers;
        self
    }

    /// Returns a copy with one header set.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    /// Returns a copy with one header removed.
    pub fn without_header(mut self, name: &str) -> Self {
        if let Some(headers) = self.headers.as_mut() {
            headers.remove(name);
        }
        self
    }

    pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_content_type_parsing(mut self, apply: bool) -> Self {
        self.apply_content_type_parsing = apply;
        self
    }

    pub fn with_content_type_override(mut self, content_type: Option<String>) -> Self {
        self.content_type_override = content_type;
        self
    }

    pub fn with_allow_cached_response(mut self, allow: bool) -> Self {
        self.allow_cached_response = allow;
        self
    }

    pub fn with_cache_expiration(mut self, seconds: u64) -> Self {
        self.cache_response_with_expiration = seconds;
        self
    }

    pub fn with_custom_cache_identifier(mut self, identifier: Option<String>) -> Self {
        self.custom_cache_identifier = identifier;
        self
    }
}
