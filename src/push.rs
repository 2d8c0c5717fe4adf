//! Push notification subscription and publishing.
//!
//! The remote API exposes push management as plain JSON `POST`s under
//! `/push/{endpoint}/{method}`. A [`PushNotificationsProvider`] turns each
//! operation into such a request and submits it through a [`Gateway`], so
//! these requests are queued, processed and delivered like any other.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::{CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE};
use crate::gateway::{Gateway, RequestCallback, RequestResult};
use crate::request::{IssuedRequest, Method};

/// A device subscription to a push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub platform: String,
    pub channel: String,
    /// Subscription lifetime, as understood by the remote endpoint
    pub period: u32,
    pub name: String,
    pub token: String,
}

/// How an unsubscribe call identifies the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscriber {
    Name(String),
    Token(String),
}

/// Builds and submits push notification requests.
///
/// Implementations must submit through `gateway` and return the handle it
/// issued.
pub trait PushNotificationsProvider: Send + Sync {
    fn subscribe(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        subscription: &Subscription,
        callback: RequestCallback,
    ) -> IssuedRequest;

    fn unsubscribe(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        platform: &str,
        channel: &str,
        subscriber: &Subscriber,
        callback: RequestCallback,
    ) -> IssuedRequest;

    /// Sends `payload` to every subscriber of `channel` in `environment`.
    ///
    /// The payload maps push platforms to platform-specific messages; the
    /// `"default"` entry is used for platforms without one.
    fn publish(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        channel: &str,
        environment: &str,
        payload: &Value,
        callback: RequestCallback,
    ) -> IssuedRequest;
}

/// The stock push protocol: JSON bodies posted to `/push/{endpoint}/{method}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPushNotificationsProvider;

impl DefaultPushNotificationsProvider {
    fn resolve_path(endpoint: &str, method: &str) -> String {
        format!("/push/{}/{}", endpoint, method)
    }

    fn post_json(
        gateway: &Gateway,
        endpoint: &str,
        method: &str,
        body: Value,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let request = gateway
            .template(Method::Post, Self::resolve_path(endpoint, method))
            .with_header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
            .with_body(Some(body.to_string().into_bytes()));
        log::debug!("Push {} on endpoint {}", method, endpoint);
        gateway.submit(request, callback)
    }
}

impl PushNotificationsProvider for DefaultPushNotificationsProvider {
    fn subscribe(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        subscription: &Subscription,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let body = json!({
            "platform": subscription.platform,
            "channel": subscription.channel,
            "period": subscription.period,
            "name": subscription.name,
            "token": subscription.token,
        });
        Self::post_json(gateway, endpoint, "subscribe", body, callback)
    }

    fn unsubscribe(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        platform: &str,
        channel: &str,
        subscriber: &Subscriber,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let mut body = json!({
            "platform": platform,
            "channel": channel,
        });
        let (field, value) = match subscriber {
            Subscriber::Name(name) => ("name", name),
            Subscriber::Token(token) => ("token", token),
        };
        body[field] = Value::String(value.clone());
        Self::post_json(gateway, endpoint, "unsubscribe", body, callback)
    }

    fn publish(
        &self,
        gateway: &Gateway,
        endpoint: &str,
        channel: &str,
        environment: &str,
        payload: &Value,
        callback: RequestCallback,
    ) -> IssuedRequest {
        let body = json!({
            "channel": channel,
            "environment": environment,
            "payload": payload,
        });
        Self::post_json(gateway, endpoint, "publish", body, callback)
    }
}

/// Push notification methods bound to one gateway.
///
/// Obtained from [`Gateway::push_notifications`].
pub struct PushNotifications<'a> {
    gateway: &'a Gateway,
    provider: Arc<dyn PushNotificationsProvider>,
}

impl<'a> PushNotifications<'a> {
    pub(crate) fn new(gateway: &'a Gateway, provider: Arc<dyn PushNotificationsProvider>) -> Self {
        PushNotifications { gateway, provider }
    }

    pub fn subscribe<F>(&self, endpoint: &str, subscription: &Subscription, callback: F) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        self.provider
            .subscribe(self.gateway, endpoint, subscription, Box::new(callback))
    }

    pub fn unsubscribe_name<F>(
        &self,
        endpoint: &str,
        platform: &str,
        channel: &str,
        name: &str,
        callback: F,
    ) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        let subscriber = Subscriber::Name(name.to_string());
        self.provider.unsubscribe(
            self.gateway,
            endpoint,
            platform,
            channel,
            &subscriber,
            Box::new(callback),
        )
    }

    pub fn unsubscribe_token<F>(
        &self,
        endpoint: &str,
        platform: &str,
        channel: &str,
        token: &str,
        callback: F,
    ) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        let subscriber = Subscriber::Token(token.to_string());
        self.provider.unsubscribe(
            self.gateway,
            endpoint,
            platform,
            channel,
            &subscriber,
            Box::new(callback),
        )
    }

    pub fn publish<F>(
        &self,
        endpoint: &str,
        channel: &str,
        environment: &str,
        payload: &Value,
        callback: F,
    ) -> IssuedRequest
    where
        F: FnOnce(RequestResult) + Send + 'static,
    {
        self.provider.publish(
            self.gateway,
            endpoint,
            channel,
            environment,
            payload,
            Box::new(callback),
        )
    }
}
