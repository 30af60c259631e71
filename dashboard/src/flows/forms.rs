use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::constants::paths;
use crate::errors::ValidationError;
use crate::http::{QueryParams, QueryValue};
use crate::lnurl::LnurlRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Withdraw,
    Channel,
    Auth,
}

impl FlowKind {
    pub const ALL: [FlowKind; 3] = [FlowKind::Withdraw, FlowKind::Channel, FlowKind::Auth];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Withdraw => "withdraw",
            FlowKind::Channel => "channel",
            FlowKind::Auth => "auth",
        }
    }

    /// Gateway path that creates a request for this flow
    pub fn create_path(&self) -> &'static str {
        match self {
            FlowKind::Withdraw => paths::WITHDRAW_REQUEST,
            FlowKind::Channel => paths::CHANNEL_REQUEST,
            FlowKind::Auth => paths::LNURL_AUTH_REQUEST,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "withdraw" => Ok(FlowKind::Withdraw),
            "channel" => Ok(FlowKind::Channel),
            "auth" => Ok(FlowKind::Auth),
            other => Err(format!("Unknown flow '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawForm {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelForm {
    #[serde(default)]
    pub remote_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub announce: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub sig: String,
    #[serde(default)]
    pub tag: String,
}

/// Operator input for the callback step, exactly as typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "lowercase")]
pub enum FlowForm {
    Withdraw(WithdrawForm),
    Channel(ChannelForm),
    Auth(AuthForm),
}

impl FlowForm {
    pub fn kind(&self) -> FlowKind {
        match self {
            FlowForm::Withdraw(_) => FlowKind::Withdraw,
            FlowForm::Channel(_) => FlowKind::Channel,
            FlowForm::Auth(_) => FlowKind::Auth,
        }
    }

    /// Decode an untagged JSON form for a known flow
    pub fn from_value(kind: FlowKind, value: Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        Ok(match kind {
            FlowKind::Withdraw => FlowForm::Withdraw(serde_json::from_value(value)?),
            FlowKind::Channel => FlowForm::Channel(serde_json::from_value(value)?),
            FlowKind::Auth => FlowForm::Auth(serde_json::from_value(value)?),
        })
    }

    /// Validate the form and build the callback query for `request`
    pub fn to_query(&self, request: &LnurlRequest) -> Result<QueryParams, ValidationError> {
        let k1 = Some(QueryValue::from(request.k1.as_str()));

        match self {
            FlowForm::Withdraw(form) => {
                let destination = required(&form.destination, "destination")?;
                let amount = parse_amount(&form.amount)?;
                Ok(vec![
                    ("k1", k1),
                    ("destination", Some(destination.into())),
                    ("amount", amount.map(QueryValue::from)),
                ])
            }
            FlowForm::Channel(form) => {
                let remote_id = required(&form.remote_id, "remote_id")?;
                let amount = parse_amount(&form.amount)?;
                let announce = parse_announce(&form.announce)?;
                Ok(vec![
                    ("k1", k1),
                    ("remote_id", Some(remote_id.into())),
                    ("amount", amount.map(QueryValue::from)),
                    ("announce", announce.map(QueryValue::from)),
                ])
            }
            FlowForm::Auth(form) => {
                let key = required(&form.key, "key")?;
                let sig = required(&form.sig, "sig")?;
                let tag = form.tag.trim();
                Ok(vec![
                    ("k1", k1),
                    ("key", Some(key.into())),
                    ("sig", Some(sig.into())),
                    ("action", request.action.clone().map(QueryValue::from)),
                    ("tag", (!tag.is_empty()).then(|| QueryValue::from(tag))),
                ])
            }
        }
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

/// Optional amount: blank is absent, otherwise a finite non-negative number
/// floored to an integer
pub fn parse_amount(raw: &str) -> Result<Option<u64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || ValidationError::InvalidAmount {
        raw: raw.to_string(),
    };
    let amount: f64 = trimmed.parse().map_err(|_| invalid())?;
    // u64::MAX rounds up to 2^64 as f64, so `>=` rejects everything that would saturate
    if !amount.is_finite() || amount < 0.0 || amount >= u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(Some(amount.floor() as u64))
}

/// Optional announce flag: blank is absent, otherwise `true` or `false` in any case
pub fn parse_announce(raw: &str) -> Result<Option<bool>, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(ValidationError::InvalidAnnounce {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn request(action: Option<&str>) -> LnurlRequest {
        LnurlRequest {
            k1: "k1-value".to_string(),
            callback: "http://gw/cb".to_string(),
            action: action.map(str::to_string),
            extra: Map::new(),
        }
    }

    fn value_of(params: &QueryParams, key: &str) -> Option<String> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_ref().map(|v| v.to_string()))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(""), Ok(None));
        assert_eq!(parse_amount("  "), Ok(None));
        assert_eq!(parse_amount("10.7"), Ok(Some(10)));
        assert_eq!(parse_amount(" 0 "), Ok(Some(0)));
        assert_eq!(parse_amount("1e3"), Ok(Some(1000)));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("1e30").is_err());
        assert!(parse_amount("18446744073709551616").is_err());
        assert_eq!(parse_amount("9007199254740992"), Ok(Some(9_007_199_254_740_992)));
    }

    #[test]
    fn test_parse_announce() {
        assert_eq!(parse_announce("TRUE"), Ok(Some(true)));
        assert_eq!(parse_announce(" false "), Ok(Some(false)));
        assert_eq!(parse_announce(""), Ok(None));
        assert_eq!(
            parse_announce("maybe"),
            Err(ValidationError::InvalidAnnounce {
                raw: "maybe".to_string()
            })
        );
    }

    #[test]
    fn test_withdraw_query() {
        let form = FlowForm::Withdraw(WithdrawForm {
            destination: " bc1qdest ".to_string(),
            amount: "10.7".to_string(),
        });
        let params = form.to_query(&request(None)).unwrap();
        assert_eq!(value_of(&params, "k1").as_deref(), Some("k1-value"));
        assert_eq!(value_of(&params, "destination").as_deref(), Some("bc1qdest"));
        assert_eq!(value_of(&params, "amount").as_deref(), Some("10"));
    }

    #[test]
    fn test_missing_destination() {
        let form = FlowForm::Withdraw(WithdrawForm::default());
        assert_eq!(
            form.to_query(&request(None)),
            Err(ValidationError::MissingField {
                field: "destination"
            })
        );
    }

    #[test]
    fn test_auth_forwards_action_and_skips_blank_tag() {
        let form = FlowForm::Auth(AuthForm {
            key: "02ab".to_string(),
            sig: "3045".to_string(),
            tag: "   ".to_string(),
        });
        let params = form.to_query(&request(Some("login"))).unwrap();
        assert_eq!(value_of(&params, "action").as_deref(), Some("login"));
        assert_eq!(value_of(&params, "tag"), None);
    }

    #[test]
    fn test_auth_requires_sig() {
        let form = FlowForm::Auth(AuthForm {
            key: "02ab".to_string(),
            ..Default::default()
        });
        assert_eq!(
            form.to_query(&request(None)),
            Err(ValidationError::MissingField { field: "sig" })
        );
    }

    #[test]
    fn test_form_from_untagged_value() {
        let form = FlowForm::from_value(
            FlowKind::Channel,
            json!({"remote_id": "03cd", "announce": "false"}),
        )
        .unwrap();
        assert_eq!(form.kind(), FlowKind::Channel);
        assert_eq!(
            form,
            FlowForm::Channel(ChannelForm {
                remote_id: "03cd".to_string(),
                amount: String::new(),
                announce: "false".to_string(),
            })
        );
    }

    #[test]
    fn test_flow_kind_from_str() {
        assert_eq!("auth".parse::<FlowKind>(), Ok(FlowKind::Auth));
        assert!("pay".parse::<FlowKind>().is_err());
    }
}
