// File: dashboard/src/http/mod.rs
//! HTTP primitives shared by every gateway call
//!
//! # Layout
//!
//! ```text
//! LnurlClient / HealthPoller / RecentRequestsFeed
//!                   ↓
//!     with_query / join_url   (URL building)
//!                   ↓
//!   HttpFetcher::get_json     (GET/DELETE, JSON-or-text body, typed errors)
//!                   ↑
//!            CancelSignal      (aborts the request, never updates state)
//! ```
//!
//! The fetcher performs no retries and imposes no timeout of its own unless
//! one is configured.

pub mod cancel;
pub mod fetch;
pub mod query;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use fetch::{parse_maybe_json, HttpFetcher};
pub use query::{join_url, with_query, QueryParams, QueryValue};
