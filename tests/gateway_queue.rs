//! Queueing, admission and cancellation through the gateway.

mod helpers;

use std::sync::Arc;

use helpers::{collector, next_result, test_config, wait_until, ManualTransport, Results};
use request_gateway::{
    DefaultFieldsRequestPreparer, Gateway, GatewayConfig, GatewayError, GatewayEvent, Method,
    Request,
};

fn gateway_with(transport: Arc<ManualTransport>, config: GatewayConfig) -> Gateway {
    Gateway::builder(config)
        .transport(transport)
        .build()
        .expect("gateway builds inside a runtime")
}

fn single_slot() -> GatewayConfig {
    GatewayConfig {
        max_active_requests: 1,
        ..test_config()
    }
}

fn get(path: &str) -> Request {
    Request::new(Method::Get, path)
}

fn paths(requests: &[request_gateway::IssuedRequest]) -> Vec<String> {
    requests.iter().map(|r| r.request().path.clone()).collect()
}

#[tokio::test]
async fn test_paused_gateway_keeps_requests_pending_in_order() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let results = Results::new();

    for path in ["/1", "/2", "/3"] {
        gateway.submit(get(path), results.callback());
    }

    assert!(gateway.is_paused());
    assert_eq!(paths(&gateway.pending_requests()), ["/1", "/2", "/3"]);
    assert_eq!(gateway.active_count(), 0);
    tokio::task::yield_now().await;
    assert_eq!(transport.submitted_count(), 0);
}

#[tokio::test]
async fn test_resume_drains_up_to_limit_then_on_completion() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let mut results = Results::new();

    for path in ["/1", "/2", "/3"] {
        gateway.submit(get(path), results.callback());
    }
    gateway.resume();

    assert_eq!(gateway.active_count(), 2);
    assert_eq!(paths(&gateway.pending_requests()), ["/3"]);
    transport.wait_for_submissions(2).await;
    assert_eq!(paths(&transport.outstanding()), ["/1", "/2"]);

    transport.complete_next(200);
    let first = results.next().await;
    assert_eq!(first.request.request().path, "/1");
    assert!(first.is_ok());

    transport.wait_for_submissions(3).await;
    assert_eq!(gateway.pending_count(), 0);
    assert_eq!(gateway.active_count(), 2);
}

#[tokio::test]
async fn test_single_slot_admits_exactly_the_next_request() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), single_slot());
    let mut results = Results::new();

    for path in ["/a", "/b", "/c"] {
        gateway.submit(get(path), results.callback());
    }
    gateway.resume();

    transport.wait_for_submissions(1).await;
    assert_eq!(gateway.active_count(), 1);
    assert_eq!(gateway.pending_count(), 2);

    transport.complete_next(200);
    transport.wait_for_submissions(2).await;
    assert_eq!(results.next().await.request.request().path, "/a");
    assert_eq!(gateway.active_count(), 1);
    assert_eq!(paths(&gateway.pending_requests()), ["/c"]);
    assert_eq!(paths(&transport.outstanding()), ["/b"]);
}

#[tokio::test]
async fn test_cancel_pending_request_skips_transport() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let (cancelled_callback, mut cancelled) = collector();
    let (kept_callback, mut kept) = collector();

    let doomed = gateway.submit(get("/doomed"), cancelled_callback);
    gateway.submit(get("/kept"), kept_callback);

    assert!(gateway.cancel_request(&doomed));
    assert!(!gateway.cancel_request(&doomed), "second cancel finds nothing");
    assert_eq!(paths(&gateway.pending_requests()), ["/kept"]);

    let result = next_result(&mut cancelled).await;
    assert!(matches!(result.error, Some(GatewayError::Cancelled)));
    assert!(result.response.is_none());

    gateway.resume();
    transport.wait_for_submissions(1).await;
    assert_eq!(paths(&transport.outstanding()), ["/kept"]);
    transport.complete_next(200);
    assert!(next_result(&mut kept).await.is_ok());

    assert_eq!(transport.submitted_count(), 1);
    assert_eq!(gateway.stats().get(GatewayEvent::Cancelled), 1);
    assert_eq!(gateway.stats().get(GatewayEvent::CacheMiss), 0);
}

#[tokio::test]
async fn test_cancel_active_request_returns_false() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let (callback, mut receiver) = collector();

    let request = gateway.submit(get("/busy"), callback);
    gateway.resume();
    transport.wait_for_submissions(1).await;

    assert!(!gateway.cancel_request(&request));

    transport.complete_next(204);
    let result = next_result(&mut receiver).await;
    assert!(result.is_ok());
    assert_eq!(result.response.map(|r| r.status_code), Some(204));
}

#[tokio::test]
async fn test_pause_stops_further_admission() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), single_slot());
    let mut results = Results::new();

    gateway.resume();
    gateway.submit(get("/first"), results.callback());
    gateway.submit(get("/second"), results.callback());
    transport.wait_for_submissions(1).await;

    gateway.pause();
    transport.complete_next(200);
    assert_eq!(results.next().await.request.request().path, "/first");

    assert_eq!(gateway.active_count(), 0);
    assert_eq!(paths(&gateway.pending_requests()), ["/second"]);
    assert_eq!(transport.submitted_count(), 1);

    gateway.resume();
    transport.wait_for_submissions(2).await;
}

#[tokio::test]
async fn test_raising_limit_admits_waiting_requests() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), single_slot());
    let results = Results::new();

    for path in ["/1", "/2", "/3"] {
        gateway.submit(get(path), results.callback());
    }
    gateway.resume();
    assert_eq!(gateway.active_count(), 1);

    gateway.set_max_active_requests(3);
    assert_eq!(gateway.max_active_requests(), 3);
    assert_eq!(gateway.active_count(), 3);
    transport.wait_for_submissions(3).await;
}

#[tokio::test]
async fn test_foreign_requests_are_rejected() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let other = gateway_with(ManualTransport::new(), test_config());
    let (callback, _receiver) = collector();

    let foreign = other.submit(get("/theirs"), callback);

    assert!(!gateway.cancel_request(&foreign));
    gateway.fulfill_request(foreign, None, None);

    assert_eq!(gateway.stats().get(GatewayEvent::ForeignRequest), 2);
    assert_eq!(other.pending_count(), 1, "foreign cancel left the owner untouched");
}

#[tokio::test]
async fn test_execute_reports_cancellation() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());

    let pending = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.execute(get("/later")).await })
    };
    wait_until(|| gateway.pending_count() == 1).await;

    let queued = gateway.pending_requests().remove(0);
    assert!(gateway.cancel_request(&queued));

    let outcome = pending.await.unwrap();
    assert!(matches!(outcome, Err(GatewayError::Cancelled)));
    assert_eq!(transport.submitted_count(), 0);
}

#[tokio::test]
async fn test_execute_returns_response() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    gateway.resume();

    let pending = {
        let gateway = gateway.clone();
        tokio::spawn(async move { gateway.execute(get("/now")).await })
    };
    transport.wait_for_submissions(1).await;
    transport.complete_next(201);

    let response = pending.await.unwrap().unwrap();
    assert_eq!(response.status_code, 201);
    assert!(!response.retrieved_from_cache);
    assert_eq!(
        response.requested_url.as_str(),
        "http://gateway.test/api/now"
    );
}

#[tokio::test]
async fn test_preparer_runs_before_queueing() {
    let transport = ManualTransport::new();
    let preparer = DefaultFieldsRequestPreparer::default()
        .with_header("X-Api-Key", "secret")
        .with_param("v", 2);
    let gateway = Gateway::builder(test_config())
        .transport(transport.clone())
        .preparer(Arc::new(preparer))
        .build()
        .unwrap();
    let (callback, _receiver) = collector();

    let issued = gateway.submit(get("/prepared").with_header("x-api-key", "mine"), callback);

    let queued = &gateway.pending_requests()[0];
    assert_eq!(queued.request().header("X-Api-Key"), Some("mine"));
    assert!(queued.request().params.as_ref().unwrap().contains_key("v"));
    assert_eq!(&issued, queued);
}

#[tokio::test]
async fn test_convenience_verbs_use_templates() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let results = Results::new();

    gateway.get("/g", results.callback());
    gateway.post("/p", Some(b"{}".to_vec()), results.callback());
    gateway.put("/u", None, results.callback());
    gateway.delete("/d", results.callback());

    let pending = gateway.pending_requests();
    let methods: Vec<Method> = pending.iter().map(|r| r.request().method).collect();
    assert_eq!(methods, [Method::Get, Method::Post, Method::Put, Method::Delete]);
    assert!(pending[0].request().allow_cached_response);
    assert_eq!(pending[0].request().cache_response_with_expiration, 300);
    assert!(!pending[1].request().allow_cached_response);
    assert_eq!(pending[1].request().body.as_deref(), Some(&b"{}"[..]));
    assert_eq!(pending[3].request().method, Method::Delete);
}

#[tokio::test]
async fn test_identical_active_requests_get_their_own_results() {
    let transport = ManualTransport::new();
    let gateway = gateway_with(transport.clone(), test_config());
    let (first_callback, mut first) = collector();
    let (second_callback, mut second) = collector();

    gateway.resume();
    let post = |body: &[u8]| Request::new(Method::Post, "/orders").with_body(Some(body.to_vec()));
    gateway.submit(post(b"one"), first_callback);
    gateway.submit(post(b"two"), second_callback);
    transport.wait_for_submissions(2).await;

    transport.complete_at(1, 201);
    let result = next_result(&mut second).await;
    assert_eq!(result.request.request().body.as_deref(), Some(&b"two"[..]));

    transport.complete_next(201);
    let result = next_result(&mut first).await;
    assert_eq!(result.request.request().body.as_deref(), Some(&b"one"[..]));
}
