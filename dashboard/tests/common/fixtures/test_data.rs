//! Canned gateway payloads

use serde_json::{json, Value};
use std::sync::Arc;

use dashboard::http::HttpFetcher;

pub const TEST_K1: &str = "e2af6254a8df433264fa23f67eb8188635d15ce883e8fc020989d5f82ae6f11e";

pub fn test_fetcher() -> Arc<HttpFetcher> {
    Arc::new(HttpFetcher::new(None).expect("http client"))
}

pub fn health_json(lightning: &str, bitcoin: &str, chain: &str, blocks: u64) -> Value {
    json!({
        "lightning": {
            "status": lightning,
            "alias": "gateway-node",
            "pubkey": "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619",
            "cln_version": "v24.11",
            "num_peers": 4,
            "num_active_channels": 2,
            "num_pending_channels": 0
        },
        "bitcoin": {
            "status": bitcoin,
            "chain": chain,
            "blocks": blocks,
            "headers": blocks,
            "verification_progress": 0.9999,
            "initial_block_download": false,
            "connections": 10,
            "version": 270000,
            "subversion": "/Satoshi:27.0.0/",
            "warnings": null
        },
        "min_withdrawable_msat": 1000,
        "max_withdrawable_msat": 100000000,
        "warning_bitcoind_sync": null,
        "warning_lightningd_sync": null
    })
}

pub fn withdraw_request_json(k1: &str, callback: &str) -> Value {
    json!({
        "tag": "withdrawRequest",
        "callback": callback,
        "k1": k1,
        "defaultDescription": "Withdraw funds from CoreLightning REST server",
        "minWithdrawable": 1000,
        "maxWithdrawable": 100000000
    })
}

pub fn channel_request_json(k1: &str, callback: &str) -> Value {
    json!({
        "tag": "channelRequest",
        "uri": "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619@127.0.0.1:9735",
        "callback": callback,
        "k1": k1
    })
}

pub fn auth_request_json(k1: &str, callback: &str, action: Option<&str>) -> Value {
    json!({
        "tag": "login",
        "k1": k1,
        "callback": callback,
        "action": action
    })
}

pub fn recent_entry(ts_ms: u64, method: &str, path: &str, status: u16) -> Value {
    json!({
        "ts_ms": ts_ms,
        "client_addr": "10.0.0.7",
        "method": method,
        "path": path,
        "status": status,
        "ok": status < 400
    })
}

pub fn recent_entries() -> Value {
    json!([
        recent_entry(1_700_000_003_000, "GET", "/health", 200),
        recent_entry(1_700_000_002_000, "GET", "/withdraw-request", 200),
        recent_entry(1_700_000_001_000, "GET", "/withdraw-callback", 400),
    ])
}
