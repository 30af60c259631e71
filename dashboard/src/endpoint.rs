//! Operator-entered remote gateway endpoint.
//!
//! The endpoint is either empty (unset) or `scheme://rest` with no trailing
//! slashes. It is read once from the settings database at startup and
//! written back whenever it changes to a non-empty value. Storage trouble is
//! logged and otherwise ignored: losing the remembered endpoint is not an
//! error the operator needs to see.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::config::PageScheme;
use crate::constants::endpoint::STORAGE_KEY;
use crate::database::Database;

fn strip_http_prefix(value: &str) -> Option<(&str, &str)> {
    for prefix_len in ["http://".len(), "https://".len()] {
        if let Some(prefix) = value.get(..prefix_len) {
            let lower = prefix.to_ascii_lowercase();
            if lower == "http://" || lower == "https://" {
                return Some((prefix, &value[prefix_len..]));
            }
        }
    }
    None
}

/// Normalize an operator-typed endpoint.
///
/// Idempotent: `normalize_endpoint(&normalize_endpoint(x, s), s) == normalize_endpoint(x, s)`.
pub fn normalize_endpoint(raw: &str, scheme: PageScheme) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let (prefix, rest) = match strip_http_prefix(trimmed) {
        Some((prefix, rest)) => (prefix.to_string(), rest),
        None => match trimmed.strip_prefix("//") {
            Some(rest) => (format!("{}://", scheme), rest),
            None => (format!("{}://", scheme), trimmed),
        },
    };

    let rest = rest.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
    if rest.is_empty() {
        return String::new();
    }

    format!("{}{}", prefix, rest)
}

pub struct EndpointStore {
    database: Option<Arc<Database>>,
    scheme: PageScheme,
    current: watch::Sender<String>,
    write_lock: Mutex<()>,
}

impl EndpointStore {
    /// Read the remembered endpoint; any storage failure yields an unset store
    pub async fn load(database: Option<Arc<Database>>, scheme: PageScheme) -> Self {
        let stored = match &database {
            Some(db) => match db.get_setting(STORAGE_KEY).await {
                Ok(record) => record.map(|r| r.value),
                Err(e) => {
                    warn!("Could not read remembered endpoint, starting unset: {}", e);
                    None
                }
            },
            None => None,
        };

        let initial = stored
            .as_deref()
            .map(|value| normalize_endpoint(value, scheme))
            .unwrap_or_default();

        let store = Self {
            database,
            scheme,
            current: watch::Sender::new(initial.clone()),
            write_lock: Mutex::new(()),
        };

        if !initial.is_empty() {
            info!("Restored remote endpoint {}", initial);
            if stored.as_deref() != Some(initial.as_str()) {
                store.persist(&initial).await;
            }
        }

        store
    }

    pub fn get(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn is_set(&self) -> bool {
        !self.current.borrow().is_empty()
    }

    pub fn scheme(&self) -> PageScheme {
        self.scheme
    }

    /// Observe endpoint changes
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Normalize `raw`, publish it and remember it when non-empty
    pub async fn set(&self, raw: &str) -> String {
        let _guard = self.write_lock.lock().await;
        let normalized = normalize_endpoint(raw, self.scheme);

        let previous = self.current.send_replace(normalized.clone());
        if previous != normalized {
            info!(
                "Remote endpoint changed: '{}' -> '{}'",
                previous, normalized
            );
        }

        if !normalized.is_empty() {
            self.persist(&normalized).await;
        }

        normalized
    }

    async fn persist(&self, value: &str) {
        let Some(db) = &self.database else {
            debug!("No settings database, endpoint kept in memory only");
            return;
        };
        if let Err(e) = db.upsert_setting(STORAGE_KEY, value).await {
            warn!("Could not remember remote endpoint: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_without_database() {
        let store = EndpointStore::load(None, PageScheme::Http).await;
        assert!(!store.is_set());

        let mut rx = store.subscribe();
        assert_eq!(store.set(" gw.example.com/ ").await, "http://gw.example.com");
        assert!(store.is_set());
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "http://gw.example.com");

        assert_eq!(store.set("   ").await, "");
        assert!(!store.is_set());
    }

    #[test]
    fn test_prefix_detection_is_case_insensitive() {
        assert_eq!(
            normalize_endpoint("HTTPS://Gw.Example.com//", PageScheme::Http),
            "HTTPS://Gw.Example.com"
        );
    }

    #[test]
    fn test_scheme_only_is_unset() {
        assert_eq!(normalize_endpoint("http://", PageScheme::Http), "");
        assert_eq!(normalize_endpoint("//", PageScheme::Https), "");
        assert_eq!(normalize_endpoint("/", PageScheme::Http), "");
    }
}
