//! Central repository for intervals, limits and fixed keys
//!
//! Grouped by the component that owns them so the values that shape
//! wire behaviour (truncation limits, storage keys) live in one place.

use std::time::Duration;

/// HTTP fetch primitive limits
pub mod http {
    /// Text bodies longer than this are cut in error messages
    pub const ERROR_MESSAGE_MAX_CHARS: usize = 1200;

    /// Detail strings handed to the presentation are cut at this length
    pub const ERROR_DETAILS_MAX_CHARS: usize = 1600;

    /// Marker appended to truncated text
    pub const ELLIPSIS: &str = "…";
}

/// Remote endpoint persistence
pub mod endpoint {
    /// Settings key holding the operator's remote gateway URL
    pub const STORAGE_KEY: &str = "ln-gateway.remoteBaseUrl";
}

/// Gateway paths consumed by the dashboard
pub mod paths {
    pub const HEALTH: &str = "/health";
    pub const WITHDRAW_REQUEST: &str = "/withdraw-request";
    pub const CHANNEL_REQUEST: &str = "/channel-request";
    pub const LNURL_AUTH_REQUEST: &str = "/lnurl-auth-request";
    pub const RECENT_REQUESTS: &str = "/recent-requests";
}

/// Background polling defaults
pub mod polling {
    use super::Duration;

    /// Health snapshot refresh interval
    pub const HEALTH_INTERVAL_SECONDS: u64 = 5;

    /// Recent requests refresh interval
    pub const RECENT_REQUESTS_INTERVAL_SECONDS: u64 = 3;

    /// Number of recent requests fetched per refresh
    pub const RECENT_REQUESTS_LIMIT: usize = 15;

    /// Delay before the single retry of a failed clear
    pub const CLEAR_RETRY_DELAY: Duration = Duration::from_secs(1);
}

/// Web server defaults
pub mod web {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8096;
}
