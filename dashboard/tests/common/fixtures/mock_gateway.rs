//! Mock LNURL gateway for testing the dashboard against canned answers
//!
//! This simulates the gateway's REST surface without a Lightning node.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use super::test_data::*;

/// Mock gateway server
pub struct MockGatewayServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockGatewayServer {
    /// Create a new mock gateway server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Mock a healthy node on `chain`
    pub async fn mock_health_ok(&self, chain: &str, blocks: u64) {
        self.mock_health(health_json("ok", "ok", chain, blocks)).await;
    }

    pub async fn mock_health(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock health answering once, slowly
    pub async fn mock_health_once_delayed(&self, body: Value, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Mock health failing with `status` and a JSON error body
    pub async fn mock_health_error(&self, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({
                    "status": status,
                    "error": message
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock withdraw-request with a relative callback, as the gateway sends it
    pub async fn mock_withdraw_request(&self, k1: &str) {
        Mock::given(method("GET"))
            .and(path("/withdraw-request"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(withdraw_request_json(k1, "/withdraw-callback")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock withdraw-request that answers once after `delay`
    pub async fn mock_withdraw_request_once_delayed(&self, k1: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/withdraw-request"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(withdraw_request_json(k1, "/withdraw-callback"))
                    .set_delay(delay),
            )
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_channel_request(&self, k1: &str) {
        let callback = self.url("/open-channel");
        Mock::given(method("GET"))
            .and(path("/channel-request"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(channel_request_json(k1, &callback)),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock lnurl-auth-request echoing the `action` query parameter
    pub async fn mock_auth_request(&self, k1: &str) {
        let callback = self.url("/lnurl-auth-callback");
        let k1 = k1.to_string();
        Mock::given(method("GET"))
            .and(path("/lnurl-auth-request"))
            .respond_with(move |req: &Request| {
                let action = req
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "action")
                    .map(|(_, v)| v.into_owned());
                ResponseTemplate::new(200).set_body_json(auth_request_json(
                    &k1,
                    &callback,
                    action.as_deref(),
                ))
            })
            .mount(&self.server)
            .await;
    }

    /// Mock a callback answering `{"status": "OK"}`
    pub async fn mock_callback_ok(&self, callback_path: &str) {
        Mock::given(method("GET"))
            .and(path(callback_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_callback_delayed(&self, callback_path: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(callback_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "OK"}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a callback rejecting with an LNURL error body
    pub async fn mock_callback_error(&self, callback_path: &str, status: u16, reason: &str) {
        Mock::given(method("GET"))
            .and(path(callback_path))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "status": "ERROR",
                "error": reason
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_recent_requests(&self, entries: Value) {
        Mock::given(method("GET"))
            .and(path("/recent-requests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries))
            .mount(&self.server)
            .await;
    }

    /// Mock DELETE /recent-requests answering `status` up to `times` times
    pub async fn mock_clear_recent_requests(&self, status: u16, times: u64) {
        Mock::given(method("DELETE"))
            .and(path("/recent-requests"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Requests received for `request_path`, oldest first
    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    /// Value of query parameter `key` on a received request
    pub fn query_value(request: &Request, key: &str) -> Option<String> {
        request
            .url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}
