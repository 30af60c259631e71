// File: dashboard/src/lnurl/client.rs
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::types::LnurlRequest;
use crate::constants::paths;
use crate::errors::FetchError;
use crate::http::{join_url, with_query, CancelSignal, HttpFetcher, QueryValue};

/// LNURL client bound to one normalized gateway endpoint.
///
/// Holds no per-request state; a changed endpoint gets a fresh client.
#[derive(Debug, Clone)]
pub struct LnurlClient {
    endpoint: String,
    fetcher: Arc<HttpFetcher>,
}

impl LnurlClient {
    pub fn new(endpoint: impl Into<String>, fetcher: Arc<HttpFetcher>) -> Self {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        Self { endpoint, fetcher }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, cancel), fields(endpoint = %self.endpoint))]
    pub async fn create_withdraw_request(
        &self,
        cancel: Option<&CancelSignal>,
    ) -> Result<LnurlRequest, FetchError> {
        let url = join_url(&self.endpoint, paths::WITHDRAW_REQUEST);
        self.fetch_request(&url, cancel).await
    }

    #[instrument(skip(self, cancel), fields(endpoint = %self.endpoint))]
    pub async fn create_channel_request(
        &self,
        cancel: Option<&CancelSignal>,
    ) -> Result<LnurlRequest, FetchError> {
        let url = join_url(&self.endpoint, paths::CHANNEL_REQUEST);
        self.fetch_request(&url, cancel).await
    }

    #[instrument(skip(self, cancel), fields(endpoint = %self.endpoint))]
    pub async fn create_auth_request(
        &self,
        action: Option<&str>,
        cancel: Option<&CancelSignal>,
    ) -> Result<LnurlRequest, FetchError> {
        let url = with_query(
            &join_url(&self.endpoint, paths::LNURL_AUTH_REQUEST),
            [("action", action.map(QueryValue::from))],
        )?;
        self.fetch_request(&url, cancel).await
    }

    /// Call `callback` with `params`; the decoded body is returned as is
    #[instrument(skip(self, params, cancel), fields(endpoint = %self.endpoint))]
    pub async fn invoke_callback<K, I>(
        &self,
        callback: &str,
        params: I,
        cancel: Option<&CancelSignal>,
    ) -> Result<Value, FetchError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Option<QueryValue>)>,
    {
        let callback = self.resolve_callback(callback)?;
        let url = with_query(&callback, params)?;
        debug!("Invoking callback {}", url);
        self.fetcher.get_json(&url, cancel).await
    }

    async fn fetch_request(
        &self,
        url: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<LnurlRequest, FetchError> {
        let mut request: LnurlRequest = self.fetcher.get_typed(url, cancel).await?;
        request.callback = self.resolve_callback(&request.callback)?;
        debug!("Received request k1={} callback={}", request.k1, request.callback);
        Ok(request)
    }

    /// Absolute callbacks pass through; relative ones are joined onto the endpoint
    fn resolve_callback(&self, callback: &str) -> Result<String, FetchError> {
        let callback = callback.trim();
        if let Ok(url) = Url::parse(callback) {
            return Ok(url.to_string());
        }

        let invalid = |reason: String| FetchError::InvalidUrl {
            url: callback.to_string(),
            reason,
        };
        let base = Url::parse(&format!("{}/", self.endpoint)).map_err(|e| invalid(e.to_string()))?;
        base.join(callback)
            .map(|url| url.to_string())
            .map_err(|e| invalid(e.to_string()))
    }
}
