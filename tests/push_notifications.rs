//! Push notification requests against a local mock server.

mod helpers;

use std::sync::Arc;

use helpers::{collector, next_result};
use request_gateway::{
    Gateway, GatewayConfig, IssuedRequest, Method, PushNotificationsProvider, RequestCallback,
    Subscriber, Subscription,
};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> GatewayConfig {
    GatewayConfig::new(Url::parse(&format!("{}/api", server.uri())).expect("valid base URL"))
}

fn subscription() -> Subscription {
    Subscription {
        platform: "apple".to_string(),
        channel: "news".to_string(),
        period: 3600,
        name: "alice-phone".to_string(),
        token: "t0k".to_string(),
    }
}

#[tokio::test]
async fn test_subscribe_and_publish_reach_push_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/push/alerts/subscribe"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "platform": "apple",
            "channel": "news",
            "period": 3600,
            "name": "alice-phone",
            "token": "t0k",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"subscribed": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/push/alerts/publish"))
        .and(body_json(json!({
            "channel": "news",
            "environment": "production",
            "payload": {"default": {"message": "hi"}},
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Gateway::new(config_for(&server)).unwrap();
    gateway.resume();
    let push = gateway.push_notifications();

    let (callback, mut receiver) = collector();
    push.subscribe("alerts", &subscription(), callback);
    let subscribed = next_result(&mut receiver).await.into_response().unwrap();
    assert_eq!(
        subscribed.parsed_body.and_then(|body| body.as_json().cloned()),
        Some(json!({"subscribed": true}))
    );

    let (callback, mut receiver) = collector();
    push.publish(
        "alerts",
        "news",
        "production",
        &json!({"default": {"message": "hi"}}),
        callback,
    );
    let published = next_result(&mut receiver).await.into_response().unwrap();
    assert_eq!(published.status_code, 202);
}

#[tokio::test]
async fn test_unsubscribe_by_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/push/alerts/unsubscribe"))
        .and(body_json(json!({"platform": "apple", "channel": "news", "token": "t0k"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Gateway::new(config_for(&server)).unwrap();
    gateway.resume();

    let (callback, mut receiver) = collector();
    gateway
        .push_notifications()
        .unsubscribe_token("alerts", "apple", "news", "t0k", callback);

    let result = next_result(&mut receiver).await;
    assert_eq!(result.response.map(|r| r.status_code), Some(204));
}

/// Provider that sends every operation to one versioned path.
struct VersionedProvider;

impl VersionedProvider {
    fn send(gateway: &Gateway, operation: &str, body: Value, callback: RequestCallback) -> IssuedRequest {
        let request = gateway
            .template(Method::Post, "/v2/push")
            .with_param("op", operation)
            .with_body(Some(body.to_string().into_bytes()));
        gateway.submit(request, callback)
    }
}

impl PushNotificationsProvider for VersionedProvider {
    fn subscribe(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        subscription: &Subscription,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let body = json!({"endpoint": endpoint, "token": subscription.token});
        Self::send(gateway, "subscribe", body, callback)
    }

    fn unsubscribe(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        _platform: &str,
        _channel: &str,
        subscriber: &Subscriber,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let body = json!({"endpoint": endpoint, "subscriber": format!("{:?}", subscriber)});
        Self::send(gateway, "unsubscribe", body, callback)
    }

    fn publish(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        channel: &str,
        _environment: &str,
        payload: &Value,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let body = json!({"endpoint": endpoint, "channel": channel, "payload": payload});
        Self::send(gateway, "publish", body, callback)
    }
}

#[tokio::test]
async fn test_custom_provider_replaces_default_protocol() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/push"))
        .and(body_json(json!({"endpoint": "alerts", "token": "t0k"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Gateway::builder(config_for(&server))
        .push_provider(Arc::new(VersionedProvider))
        .build()
        .unwrap();
    gateway.resume();

    let (callback, mut receiver) = collector();
    let issued = gateway
        .push_notifications()
        .subscribe("alerts", &subscription(), callback);

    assert_eq!(issued.request().path, "/v2/push");
    assert!(next_result(&mut receiver).await.is_ok());
}
