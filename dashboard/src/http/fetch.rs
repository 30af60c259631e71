// File: dashboard/src/http/fetch.rs
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::cancel::CancelSignal;
use crate::errors::{FetchError, HttpError};

/// Decode a response body: empty → `null`, JSON when it parses, raw text otherwise
pub fn parse_maybe_json(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Thin wrapper over a shared reqwest client that turns every response into
/// a decoded JSON value or a typed [`FetchError`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` of `None` leaves hung requests to the transport
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client })
    }

    pub async fn get_json(
        &self,
        url: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<Value, FetchError> {
        self.execute(Method::GET, url, cancel).await
    }

    pub async fn delete_json(
        &self,
        url: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<Value, FetchError> {
        self.execute(Method::DELETE, url, cancel).await
    }

    /// GET and decode into `T`; a body of the wrong shape is a protocol error
    pub async fn get_typed<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<T, FetchError> {
        let body = self.get_json(url, cancel).await?;
        serde_json::from_value(body).map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<Value, FetchError> {
        let cancelled = || FetchError::Cancelled {
            method: method.to_string(),
            url: url.to_string(),
        };

        match cancel {
            Some(signal) if signal.is_cancelled() => Err(cancelled()),
            Some(signal) => {
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => {
                        debug!("{} {} cancelled by caller", method, url);
                        Err(cancelled())
                    }
                    result = self.send(method.clone(), url) => result,
                }
            }
            None => self.send(method.clone(), url).await,
        }
    }

    async fn send(&self, method: Method, url: &str) -> Result<Value, FetchError> {
        let transport = |reason: String| FetchError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            reason,
        };

        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .request(method.clone(), parsed)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let text = response.text().await.map_err(|e| transport(e.to_string()))?;
        let body = parse_maybe_json(&text);

        if !status.is_success() {
            return Err(HttpError::new(method.as_str(), status.as_u16(), &final_url, body).into());
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_maybe_json() {
        assert_eq!(parse_maybe_json(""), Value::Null);
        assert_eq!(parse_maybe_json("   \n"), Value::Null);
        assert_eq!(parse_maybe_json(r#" {"ok": true} "#), json!({"ok": true}));
        assert_eq!(
            parse_maybe_json(" upstream timed out "),
            Value::String("upstream timed out".to_string())
        );
        assert_eq!(parse_maybe_json("42"), json!(42));
    }
}
