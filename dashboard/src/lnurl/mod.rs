//! LNURL protocol client
//!
//! Each flow is two GETs: the create call returns a `k1` and a callback, the
//! callback is then invoked with `k1` plus flow-specific parameters. The
//! client never interprets the callback's answer.

pub mod client;
pub mod types;

pub use client::LnurlClient;
pub use types::LnurlRequest;
