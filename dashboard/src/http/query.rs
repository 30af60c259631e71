use reqwest::Url;
use serde::Serialize;
use std::fmt;

use crate::errors::FetchError;

/// Scalar value carried in a query string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Text(String),
    Integer(u64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => f.write_str(s),
            QueryValue::Integer(n) => write!(f, "{}", n),
            QueryValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Key/value pairs to merge into a URL; `None` marks an absent value
pub type QueryParams = Vec<(&'static str, Option<QueryValue>)>;

/// Merge `params` into the query string of `base_url`.
///
/// Absent values and empty strings are skipped. Each remaining key replaces
/// any pair of the same name already in the URL; unrelated pairs stay.
pub fn with_query<K, I>(base_url: &str, params: I) -> Result<String, FetchError>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, Option<QueryValue>)>,
{
    let mut url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    let mut applied: Vec<(String, String)> = Vec::new();
    for (key, value) in params {
        let value = match value {
            None => continue,
            Some(QueryValue::Text(s)) if s.is_empty() => continue,
            Some(v) => v.to_string(),
        };
        let key = key.as_ref();
        match applied.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value,
            None => applied.push((key.to_string(), value)),
        }
    }

    if applied.is_empty() {
        return Ok(url.to_string());
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !applied.iter().any(|(ak, _)| ak == k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .extend_pairs(applied);

    Ok(url.to_string())
}

/// `base` without trailing slashes, followed by `path` with one leading slash
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
