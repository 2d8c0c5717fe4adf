//! Error categorization.
//!
//! Maps transport-level failures onto [`TransportErrorKind`] so they can be
//! reported and counted uniformly.

use super::types::TransportErrorKind;

/// Categorizes a `reqwest::Error` into a `TransportErrorKind`.
///
/// Status codes are not errors for the gateway: 4xx and 5xx responses are
/// delivered as responses, so only network-level failures reach this function.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The appropriate `TransportErrorKind` for the error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportErrorKind {
    if error.is_builder() {
        TransportErrorKind::Builder
    } else if error.is_redirect() {
        TransportErrorKind::Redirect
    } else if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else if error.is_request() {
        TransportErrorKind::Request
    } else if error.is_body() {
        TransportErrorKind::Body
    } else if error.is_decode() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_failure_is_categorized() {
        // Nothing listens on port 9 (discard) on the loopback interface in test environments
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let error = client.get("http://127.0.0.1:9/").send().await.unwrap_err();

        let kind = categorize_reqwest_error(&error);
        assert!(
            matches!(kind, TransportErrorKind::Connect | TransportErrorKind::Request),
            "unexpected kind {:?}",
            kind
        );
    }

    #[tokio::test]
    async fn test_builder_failure_is_categorized() {
        let client = reqwest::Client::new();
        let error = client
            .get("http://localhost/")
            .header("bad header\n", "x")
            .send()
            .await
            .unwrap_err();

        assert_eq!(categorize_reqwest_error(&error), TransportErrorKind::Builder);
    }
}
