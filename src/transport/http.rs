//! HTTP transport backed by `reqwest`.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use url::Url;

use super::Transport;
use crate::config::{GatewayConfig, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{InitializationError, TransportError, TransportErrorKind};
use crate::gateway::Gateway;
use crate::initialization::{init_client, init_redirect_client};
use crate::request::{Headers, IssuedRequest};
use crate::response::Response;

/// Sends requests over HTTP(S) with `reqwest`.
///
/// Requests that follow redirects use a client limited to
/// `MAX_REDIRECT_HOPS`; the others use a client that never follows them, so a
/// 3xx answer is delivered as the response.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Arc<reqwest::Client>,
    redirect_client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self, InitializationError> {
        Ok(ReqwestTransport {
            client: init_client(config)?,
            redirect_client: init_redirect_client(config)?,
        })
    }

    fn client_for(&self, follow_redirects: bool) -> Arc<reqwest::Client> {
        if follow_redirects {
            self.client.clone()
        } else {
            self.redirect_client.clone()
        }
    }
}

/// Flattens response headers; repeated names are joined with `", "`.
fn collect_headers(headers: &HeaderMap) -> Headers {
    let mut collected = Headers::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

async fn send(
    client: &reqwest::Client,
    url: Url,
    issued: &IssuedRequest,
) -> Result<Response, TransportError> {
    let request = issued.request();
    let method = reqwest::Method::from_bytes(request.method.as_ref().as_bytes()).map_err(|e| {
        TransportError::new(TransportErrorKind::Builder, e.to_string()).with_source(e)
    })?;

    let mut builder = client.request(method, url.clone());
    if let Some(headers) = &request.headers {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
    }
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }

    let mut http_response = builder.send().await?;
    let status = http_response.status().as_u16();
    let resolved_url = http_response.url().clone();
    let headers = collect_headers(http_response.headers());

    if let Some(length) = http_response.content_length() {
        if length > MAX_RESPONSE_BODY_SIZE as u64 {
            return Err(TransportError::new(
                TransportErrorKind::BodyTooLarge,
                format!("{} declares {} bytes", url, length),
            ));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = http_response.chunk().await? {
        if body.len() + chunk.len() > MAX_RESPONSE_BODY_SIZE {
            return Err(TransportError::new(
                TransportErrorKind::BodyTooLarge,
                format!("{} exceeded {} bytes", url, MAX_RESPONSE_BODY_SIZE),
            ));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(Response::new(issued.clone(), url, status)
        .with_resolved_url(Some(resolved_url))
        .with_headers(headers)
        .with_body(Some(body)))
}

impl Transport for ReqwestTransport {
    fn submit(&self, request: IssuedRequest, gateway: Gateway) {
        let client = self.client_for(request.request().follow_redirects);
        let url = request.request().url_for(gateway.base_url());
        tokio::spawn(async move {
            log::debug!("{} {}", request.request().method, url);
            match send(&client, url, &request).await {
                Ok(response) => gateway.fulfill_request(request, Some(response), None),
                Err(error) => {
                    log::debug!("{} failed: {}", request, error);
                    gateway.fulfill_request(request, None, Some(error));
                }
            }
        });
    }
}
