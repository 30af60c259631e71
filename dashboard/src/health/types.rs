//! Health payload served by the gateway's `/health` endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status strings the dashboard does not know are kept verbatim in `Other`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightningStatus {
    Ok,
    Syncing,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BitcoinStatus {
    Ok,
    Unreachable,
    NotConfigured,
    Other(String),
}

impl LightningStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LightningStatus::Ok => "ok",
            LightningStatus::Syncing => "syncing",
            LightningStatus::Other(raw) => raw,
        }
    }
}

impl BitcoinStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BitcoinStatus::Ok => "ok",
            BitcoinStatus::Unreachable => "unreachable",
            BitcoinStatus::NotConfigured => "notconfigured",
            BitcoinStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for LightningStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ok" => LightningStatus::Ok,
            "syncing" => LightningStatus::Syncing,
            _ => LightningStatus::Other(raw),
        }
    }
}

impl From<String> for BitcoinStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ok" => BitcoinStatus::Ok,
            "unreachable" => BitcoinStatus::Unreachable,
            "notconfigured" => BitcoinStatus::NotConfigured,
            _ => BitcoinStatus::Other(raw),
        }
    }
}

impl From<LightningStatus> for String {
    fn from(status: LightningStatus) -> Self {
        match status {
            LightningStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl From<BitcoinStatus> for String {
    fn from(status: BitcoinStatus) -> Self {
        match status {
            BitcoinStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LightningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BitcoinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightningInfo {
    pub status: LightningStatus,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub pubkey: String,
    #[serde(default)]
    pub cln_version: String,
    #[serde(default)]
    pub num_peers: u32,
    #[serde(default)]
    pub num_active_channels: u32,
    #[serde(default)]
    pub num_pending_channels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitcoinInfo {
    pub status: BitcoinStatus,
    /// Empty when bitcoind is not reachable
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub blocks: u64,
    #[serde(default)]
    pub headers: u64,
    #[serde(default)]
    pub verification_progress: f64,
    #[serde(default)]
    pub initial_block_download: bool,
    #[serde(default)]
    pub connections: u64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub subversion: String,
    #[serde(default)]
    pub warnings: Option<String>,
}

/// One immutable health payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub lightning: LightningInfo,
    pub bitcoin: BitcoinInfo,
    #[serde(default)]
    pub min_withdrawable_msat: u64,
    #[serde(default)]
    pub max_withdrawable_msat: u64,
    #[serde(default)]
    pub warning_bitcoind_sync: Option<String>,
    #[serde(default)]
    pub warning_lightningd_sync: Option<String>,
}

impl HealthSnapshot {
    /// Both subsystems report `ok`
    pub fn subsystems_ok(&self) -> bool {
        self.lightning.status == LightningStatus::Ok && self.bitcoin.status == BitcoinStatus::Ok
    }
}
