pub mod config;
pub mod constants;
pub mod database;
pub mod endpoint;
pub mod errors;
pub mod flows;
pub mod health;
pub mod http;
pub mod lnurl;
pub mod recent_requests;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigManager, PageScheme};
pub use database::Database;
pub use endpoint::{normalize_endpoint, EndpointStore};
pub use errors::{ErrorClass, FetchError, FlowError, HttpError, ValidationError};
pub use flows::{FlowController, FlowForm, FlowKind, RemoteWorkbench, Workbench};
pub use health::{derive_view, HealthPoller, HealthView};
pub use http::{with_query, HttpFetcher};
pub use lnurl::{LnurlClient, LnurlRequest};
pub use recent_requests::RecentRequestsFeed;
