//! Tests for remote endpoint normalization and persistence

mod common;

use common::fixtures::*;
use dashboard::config::PageScheme;
use dashboard::constants::endpoint::STORAGE_KEY;
use dashboard::endpoint::{normalize_endpoint, EndpointStore};
use test_case::test_case;

#[test_case("example.com", PageScheme::Http, "http://example.com" ; "bare host gets page scheme")]
#[test_case("example.com", PageScheme::Https, "https://example.com" ; "bare host on https page")]
#[test_case("http://example.com/", PageScheme::Https, "http://example.com" ; "explicit scheme kept")]
#[test_case("  https://gw.example.com:8443///  ", PageScheme::Http, "https://gw.example.com:8443" ; "whitespace and slashes trimmed")]
#[test_case("//gw.example.com/", PageScheme::Https, "https://gw.example.com" ; "protocol relative")]
#[test_case("10.0.0.5:3000/api/", PageScheme::Http, "http://10.0.0.5:3000/api" ; "path kept")]
#[test_case("   ", PageScheme::Http, "" ; "blank is unset")]
#[test_case("", PageScheme::Https, "" ; "empty is unset")]
fn test_normalize(raw: &str, scheme: PageScheme, expected: &str) {
    assert_eq!(normalize_endpoint(raw, scheme), expected);
}

#[test]
fn test_normalize_is_idempotent() {
    let inputs = [
        "example.com",
        "http://example.com/",
        "HTTP://Example.com//",
        "//host:1/",
        "host/ /",
        "https:// /",
        "///",
        "ftp://odd",
        "  gw  ",
        "http://",
        "https:/half",
        "",
    ];
    for scheme in [PageScheme::Http, PageScheme::Https] {
        for input in inputs {
            let once = normalize_endpoint(input, scheme);
            let twice = normalize_endpoint(&once, scheme);
            assert_eq!(once, twice, "not idempotent for {:?} ({})", input, scheme);
        }
    }
}

#[tokio::test]
async fn test_endpoint_survives_restart() {
    let test_db = TestDatabase::new().unwrap();

    {
        let store = EndpointStore::load(Some(test_db.open().await.unwrap()), PageScheme::Http).await;
        assert!(!store.is_set());
        assert_eq!(store.set("gw.example.com:3000/").await, "http://gw.example.com:3000");
    }

    let db = test_db.open().await.unwrap();
    let record = db.get_setting(STORAGE_KEY).await.unwrap().unwrap();
    assert_eq!(record.value, "http://gw.example.com:3000");

    let store = EndpointStore::load(Some(db), PageScheme::Http).await;
    assert!(store.is_set());
    assert_eq!(store.get(), "http://gw.example.com:3000");
}

#[tokio::test]
async fn test_stored_value_normalized_on_load() {
    let test_db = TestDatabase::new().unwrap();
    let db = test_db.open().await.unwrap();
    db.upsert_setting(STORAGE_KEY, "  legacy.example.com/ ").await.unwrap();

    let store = EndpointStore::load(Some(db.clone()), PageScheme::Https).await;
    assert_eq!(store.get(), "https://legacy.example.com");

    let record = db.get_setting(STORAGE_KEY).await.unwrap().unwrap();
    assert_eq!(record.value, "https://legacy.example.com");
}

#[tokio::test]
async fn test_unset_is_not_persisted() {
    let test_db = TestDatabase::new().unwrap();
    let db = test_db.open().await.unwrap();

    let store = EndpointStore::load(Some(db.clone()), PageScheme::Http).await;
    store.set("   ").await;
    assert!(db.get_setting(STORAGE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_storage_failure_is_swallowed() {
    let test_db = TestDatabase::new().unwrap();
    let db = test_db.open().await.unwrap();
    db.pool().close().await;

    // Closed pool: reads and writes fail, the store carries on in memory
    let store = EndpointStore::load(Some(db), PageScheme::Http).await;
    assert!(!store.is_set());
    assert_eq!(store.set("gw.example.com").await, "http://gw.example.com");
    assert_eq!(store.get(), "http://gw.example.com");
}

#[tokio::test]
async fn test_observers_see_changes() {
    let store = EndpointStore::load(None, PageScheme::Http).await;
    let mut rx = store.subscribe();

    store.set("a.example").await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), "http://a.example");

    store.set("").await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), "");
}
