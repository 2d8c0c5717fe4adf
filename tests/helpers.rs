// Shared test helpers: stub transports and callback collectors.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;

use request_gateway::{
    Gateway, GatewayConfig, Headers, IssuedRequest, RequestResult, Response, Transport,
    TransportError, TransportErrorKind,
};

/// How long a test waits for an asynchronous outcome before failing.
#[allow(dead_code)] // Used by other test files
pub const WAIT: Duration = Duration::from_secs(5);

/// Config pointing at an address nothing listens on; stub transports never use it.
#[allow(dead_code)]
pub fn test_config() -> GatewayConfig {
    GatewayConfig::new(Url::parse("http://gateway.test/api").expect("valid test URL"))
}

/// Callback that forwards every result into a channel.
#[allow(dead_code)]
pub fn collector() -> (
    impl FnOnce(RequestResult) + Send + 'static,
    mpsc::UnboundedReceiver<RequestResult>,
) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let callback = move |result: RequestResult| {
        let _ = sender.send(result);
    };
    (callback, receiver)
}

/// A channel plus a factory for callbacks feeding it, for several requests at once.
#[allow(dead_code)]
pub struct Results {
    sender: mpsc::UnboundedSender<RequestResult>,
    receiver: mpsc::UnboundedReceiver<RequestResult>,
}

#[allow(dead_code)]
impl Results {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Results { sender, receiver }
    }

    pub fn callback(&self) -> impl FnOnce(RequestResult) + Send + 'static {
        let sender = self.sender.clone();
        move |result: RequestResult| {
            let _ = sender.send(result);
        }
    }

    pub async fn next(&mut self) -> RequestResult {
        tokio::time::timeout(WAIT, self.receiver.recv())
            .await
            .expect("timed out waiting for a callback")
            .expect("callback channel closed")
    }

    /// True when no further callback has been delivered.
    pub fn none_delivered(&mut self) -> bool {
        self.receiver.try_recv().is_err()
    }
}

/// Waits for one result from a [`collector`] receiver.
#[allow(dead_code)]
pub async fn next_result(receiver: &mut mpsc::UnboundedReceiver<RequestResult>) -> RequestResult {
    tokio::time::timeout(WAIT, receiver.recv())
        .await
        .expect("timed out waiting for a callback")
        .expect("callback channel closed")
}

/// Polls `condition` until it holds, yielding to other tasks in between.
#[allow(dead_code)]
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Transport that records requests and completes them only when told to.
#[allow(dead_code)]
#[derive(Default)]
pub struct ManualTransport {
    submitted: Mutex<VecDeque<(IssuedRequest, Gateway)>>,
    total: AtomicUsize,
}

#[allow(dead_code)]
impl ManualTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of requests ever handed to this transport.
    pub fn submitted_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Requests handed over but not yet completed, oldest first.
    pub fn outstanding(&self) -> Vec<IssuedRequest> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub async fn wait_for_submissions(&self, count: usize) {
        wait_until(|| self.submitted_count() >= count).await;
    }

    /// Completes the oldest outstanding request with an empty response.
    pub fn complete_next(&self, status: u16) -> IssuedRequest {
        self.complete_at(0, status)
    }

    /// Completes the outstanding request at `index` (oldest first).
    pub fn complete_at(&self, index: usize, status: u16) -> IssuedRequest {
        let (request, gateway) = self
            .submitted
            .lock()
            .unwrap()
            .remove(index)
            .expect("no outstanding request at that index");
        let url = request.request().url_for(gateway.base_url());
        let response = Response::new(request.clone(), url, status);
        gateway.fulfill_request(request.clone(), Some(response), None);
        request
    }
}

impl Transport for ManualTransport {
    fn submit(&self, request: IssuedRequest, gateway: Gateway) {
        self.submitted.lock().unwrap().push_back((request, gateway));
        self.total.fetch_add(1, Ordering::SeqCst);
    }
}

/// What a [`StaticTransport`] answers with.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Reply {
    Response {
        status: u16,
        headers: Headers,
        body: Option<Vec<u8>>,
    },
    Error(TransportErrorKind),
    Nothing,
}

/// Transport that answers every request immediately with the same reply.
#[allow(dead_code)]
pub struct StaticTransport {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StaticTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(StaticTransport {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn status(status: u16) -> Arc<Self> {
        Self::new(Reply::Response {
            status,
            headers: Headers::new(),
            body: None,
        })
    }

    pub fn body(status: u16, content_type: &str, body: &[u8]) -> Arc<Self> {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        Self::new(Reply::Response {
            status,
            headers,
            body: Some(body.to_vec()),
        })
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for StaticTransport {
    fn submit(&self, request: IssuedRequest, gateway: Gateway) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Response {
                status,
                headers,
                body,
            } => {
                let url = request.request().url_for(gateway.base_url());
                let response = Response::new(request.clone(), url, status)
                    .with_headers(headers)
                    .with_body(body);
                gateway.fulfill_request(request, Some(response), None);
            }
            Reply::Error(kind) => {
                let error = TransportError::new(kind, "stubbed failure");
                gateway.fulfill_request(request, None, Some(error));
            }
            Reply::Nothing => gateway.fulfill_request(request, None, None),
        }
    }
}
