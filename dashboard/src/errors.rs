//! Error types for the dashboard core
//!
//! Every failure the core can surface falls in one of three classes:
//! validation (rejected before any network call), transport (the request
//! never produced a response, including cancellation) and protocol (the
//! gateway answered, but not with what was asked for).

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::constants::http::{ELLIPSIS, ERROR_DETAILS_MAX_CHARS, ERROR_MESSAGE_MAX_CHARS};

/// Coarse classification attached to errors handed to the presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    Validation,
    Transport,
    Protocol,
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Non-2xx answer from the gateway
#[derive(Debug, Clone)]
pub struct HttpError {
    pub method: String,
    pub status: u16,
    pub url: String,
    pub body: Value,
    message: String,
}

/// Failure of a single fetch
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The gateway answered with a non-2xx status
    Status(HttpError),

    /// The request never produced a response
    Transport {
        method: String,
        url: String,
        reason: String,
    },

    /// The caller's cancel signal fired first
    Cancelled { method: String, url: String },

    /// A URL could not be parsed or built
    InvalidUrl { url: String, reason: String },

    /// The body did not have the expected shape
    InvalidResponse { url: String, reason: String },
}

/// Operator input rejected before reaching the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Callback invoked before a request was created
    NoRequest { create_path: &'static str },

    /// A required form field is empty
    MissingField { field: &'static str },

    /// Amount is not a finite non-negative number
    InvalidAmount { raw: String },

    /// Announce is neither `true` nor `false`
    InvalidAnnounce { raw: String },

    /// A form for one flow was submitted to another
    FormMismatch {
        expected: &'static str,
        got: &'static str,
    },
}

/// Outcome of a create or invoke attempt that did not succeed
#[derive(Debug, Clone)]
pub enum FlowError {
    Validation(ValidationError),
    Fetch(FetchError),
    /// A newer attempt started or the controller was cancelled; this
    /// attempt's result was discarded
    Superseded,
    /// The endpoint was replaced; this controller no longer takes attempts
    Retired { endpoint: String },
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}{}", head, ELLIPSIS)
    } else {
        text.to_string()
    }
}

/// Text carried by a decoded error body: the `error` field when the body is
/// an object that has one, the text itself, or the JSON rendering.
fn body_text(body: &Value) -> String {
    match body {
        Value::Null => String::new(),
        Value::Object(map) if map.contains_key("error") => match &map["error"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

impl HttpError {
    pub fn new(method: &str, status: u16, url: &str, body: Value) -> Self {
        let method = method.to_uppercase();

        let mut details = match &body {
            Value::String(_) => truncate_chars(&body_text(&body), ERROR_MESSAGE_MAX_CHARS),
            _ => body_text(&body),
        };
        if details.is_empty() {
            details = reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default()
                .to_string();
        }

        let message = if details.is_empty() {
            format!("{} {} failed ({})", method, url, status)
        } else {
            format!("{} {} failed ({}): {}", method, url, status, details)
        };

        Self {
            method,
            status,
            url: url.to_string(),
            body,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Body-derived detail for display, falling back to the message
    pub fn details(&self) -> String {
        let text = body_text(&self.body);
        let text = if text.trim().is_empty() {
            self.message.as_str()
        } else {
            text.as_str()
        };
        truncate_chars(text.trim(), ERROR_DETAILS_MAX_CHARS)
    }
}

impl FetchError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FetchError::Status(_) | FetchError::InvalidResponse { .. } => ErrorClass::Protocol,
            FetchError::Transport { .. } | FetchError::Cancelled { .. } => ErrorClass::Transport,
            FetchError::InvalidUrl { .. } => ErrorClass::Validation,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }

    pub fn details(&self) -> String {
        match self {
            FetchError::Status(e) => e.details(),
            other => truncate_chars(&other.to_string(), ERROR_DETAILS_MAX_CHARS),
        }
    }
}

impl FlowError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FlowError::Validation(_) => ErrorClass::Validation,
            FlowError::Fetch(e) => e.class(),
            FlowError::Superseded | FlowError::Retired { .. } => ErrorClass::Transport,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FlowError::Fetch(e) => e.status(),
            _ => None,
        }
    }

    pub fn details(&self) -> String {
        match self {
            FlowError::Fetch(e) => e.details(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(e) => write!(f, "{}", e),
            FetchError::Transport {
                method,
                url,
                reason,
            } => write!(f, "{} {} failed: {}", method, url, reason),
            FetchError::Cancelled { method, url } => {
                write!(f, "{} {} was cancelled", method, url)
            }
            FetchError::InvalidUrl { url, reason } => {
                write!(f, "Invalid URL '{}': {}", url, reason)
            }
            FetchError::InvalidResponse { url, reason } => {
                write!(f, "Unexpected response from {}: {}", url, reason)
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoRequest { create_path } => {
                write!(f, "Call {} first", create_path)
            }
            ValidationError::MissingField { field } => write!(f, "{} is required", field),
            ValidationError::InvalidAmount { raw } => {
                write!(f, "Amount must be a positive number (got '{}')", raw)
            }
            ValidationError::InvalidAnnounce { raw } => {
                write!(f, "announce must be 'true' or 'false' (got '{}')", raw)
            }
            ValidationError::FormMismatch { expected, got } => {
                write!(f, "Expected a {} form, got a {} form", expected, got)
            }
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Validation(e) => write!(f, "{}", e),
            FlowError::Fetch(e) => write!(f, "{}", e),
            FlowError::Superseded => write!(f, "Superseded by a newer attempt"),
            FlowError::Retired { endpoint } => {
                write!(f, "Endpoint {} was replaced, retry against the current one", endpoint)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for HttpError {}
impl std::error::Error for FetchError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for FlowError {}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        FetchError::Status(err)
    }
}

impl From<ValidationError> for FlowError {
    fn from(err: ValidationError) -> Self {
        FlowError::Validation(err)
    }
}

impl From<FetchError> for FlowError {
    fn from(err: FetchError) -> Self {
        FlowError::Fetch(err)
    }
}
