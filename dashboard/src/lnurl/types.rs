use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First step of an LNURL flow: a one-time `k1` and the callback to hand it to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LnurlRequest {
    pub k1: String,
    /// Always absolute once returned by [`super::LnurlClient`]
    pub callback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Everything else the gateway sent (`tag`, `minWithdrawable`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LnurlRequest {
    pub fn tag(&self) -> Option<&str> {
        self.extra.get("tag").and_then(Value::as_str)
    }
}
