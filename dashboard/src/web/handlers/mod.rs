//! HTTP request handlers for the dashboard API.
//!
//! This module is organized by domain:
//! - `common` - Response envelope, status mapping, flow path resolution
//! - `flows` - Withdraw, channel and auth flows for local and remote gateways
//! - `health` - Gateway health view and manual refresh
//! - `recent_requests` - Recent requests feed and clearing
//! - `remote` - Remote endpoint selection

pub mod common;
pub mod flows;
pub mod health;
pub mod recent_requests;
pub mod remote;

pub use flows::*;
pub use health::*;
pub use recent_requests::*;
pub use remote::*;
