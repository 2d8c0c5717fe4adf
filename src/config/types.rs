//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and gateway configuration.

use structopt::StructOpt;
use strum_macros::{Display, EnumString};
use url::Url;

use crate::config::constants::{
    DEFAULT_CACHE_EXPIRATION_SECS, DEFAULT_MAX_ACTIVE_REQUESTS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::request::{Headers, Method, ParamValue, QueryParameters, Request};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Per-verb request templates used by the convenience methods.
///
/// Each template carries everything except the path. GET requests may be
/// served from and stored in the cache; the other verbs never touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRequestProperties {
    pub get: Request,
    pub post: Request,
    pub put: Request,
    pub delete: Request,
}

impl Default for DefaultRequestProperties {
    fn default() -> Self {
        Self {
            get: Request::new(Method::Get, "")
                .with_allow_cached_response(true)
                .with_cache_expiration(DEFAULT_CACHE_EXPIRATION_SECS),
            post: Request::new(Method::Post, ""),
            put: Request::new(Method::Put, ""),
            delete: Request::new(Method::Delete, ""),
        }
    }
}

impl DefaultRequestProperties {
    /// Builds a request for `path` from the template for `method`.
    ///
    /// Verbs without a template get plain [`Request::new`] defaults.
    pub fn template(&self, method: Method, path: impl Into<String>) -> Request {
        let template = match method {
            Method::Get => self.get.clone(),
            Method::Post => self.post.clone(),
            Method::Put => self.put.clone(),
            Method::Delete => self.delete.clone(),
            other => Request::new(other, ""),
        };
        template.with_method(method).with_path(path)
    }
}

/// Gateway configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use request_gateway::GatewayConfig;
/// use url::Url;
///
/// let config = GatewayConfig {
///     max_active_requests: 4,
///     ..GatewayConfig::new(Url::parse("https://api.example.com/v1").unwrap())
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL every request path is resolved against
    pub base_url: Url,

    /// Maximum number of requests handed to the transport at once
    pub max_active_requests: usize,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Templates for `get`/`post`/`put`/`delete`
    pub default_request_properties: DefaultRequestProperties,
}

impl GatewayConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            max_active_requests: DEFAULT_MAX_ACTIVE_REQUESTS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_request_properties: DefaultRequestProperties::default(),
        }
    }
}

/// Parses a `key=value` query parameter argument.
pub fn parse_param(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}': expected key=value", arg))?;
    if key.is_empty() {
        return Err(format!("invalid parameter '{}': empty key", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses a `Name: value` header argument.
pub fn parse_header(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{}': expected 'Name: value'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid header '{}': empty name", arg));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Command-line options for the `request_gateway` binary.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "request_gateway",
    about = "Send requests through a queued, caching request gateway"
)]
pub struct Opt {
    /// Base URL of the remote API
    pub base_url: Url,

    /// Paths to request, relative to the base URL
    #[structopt(required = true)]
    pub paths: Vec<String>,

    /// HTTP method
    #[structopt(short = "X", long, default_value = "GET")]
    pub method: Method,

    /// Query parameter as key=value (repeat a key to send an array)
    #[structopt(short = "p", long = "param", parse(try_from_str = parse_param), number_of_values = 1)]
    pub params: Vec<(String, String)>,

    /// Request header as "Name: value"
    #[structopt(short = "H", long = "header", parse(try_from_str = parse_header), number_of_values = 1)]
    pub headers: Vec<(String, String)>,

    /// Maximum number of concurrent requests
    #[structopt(long, default_value = "2")]
    pub max_active: usize,

    /// Cache lifetime in seconds (0 disables the cache for these requests)
    #[structopt(long)]
    pub cache_ttl: Option<u64>,

    /// Per-request timeout in seconds
    #[structopt(long, default_value = "30")]
    pub timeout: u64,

    /// Skip content-type parsing of responses
    #[structopt(long)]
    pub no_parse: bool,

    /// Treat every response as this content type
    #[structopt(long)]
    pub content_type: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[structopt(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format: plain or json
    #[structopt(long, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Opt {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            max_active_requests: self.max_active,
            timeout_seconds: self.timeout,
            ..GatewayConfig::new(self.base_url.clone())
        }
    }

    /// Collects `--param` arguments; a key given more than once becomes an array.
    pub fn query_parameters(&self) -> Option<QueryParameters> {
        if self.params.is_empty() {
            return None;
        }
        let mut params = QueryParameters::new();
        for (key, value) in &self.params {
            let value = ParamValue::from(value.as_str());
            match params.remove(key) {
                None => {
                    params.insert(key.clone(), value);
                }
                Some(ParamValue::Array(mut values)) => {
                    values.push(value);
                    params.insert(key.clone(), ParamValue::Array(values));
                }
                Some(previous) => {
                    params.insert(key.clone(), ParamValue::Array(vec![previous, value]));
                }
            }
        }
        Some(params)
    }

    pub fn header_map(&self) -> Option<Headers> {
        if self.headers.is_empty() {
            return None;
        }
        Some(self.headers.iter().cloned().collect())
    }

    /// Builds the request for one path from the verb template and the CLI flags.
    pub fn request_for(&self, config: &GatewayConfig, path: &str) -> Request {
        let mut request = config
            .default_request_properties
            .template(self.method, path)
            .with_params(self.query_parameters())
            .with_headers(self.header_map())
            .with_content_type_parsing(!self.no_parse)
            .with_content_type_override(self.content_type.clone());

        if let Some(ttl) = self.cache_ttl {
            request = request
                .with_allow_cached_response(ttl > 0)
                .with_cache_expiration(ttl);
        }
        request
    }
}
