use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON number or a numeric string; anything non-finite is `None`.
pub fn number_or_none(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Non-negative count, floored. Negative or unparsable values are `None`.
pub fn count_or_none(value: &Value) -> Option<u64> {
    number_or_none(value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.floor() as u64)
}

pub fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_or_none))
}

/// Parse an ISO8601 date and re-emit it as RFC 3339 UTC; unparsable input is kept verbatim.
pub fn normalize_timestamp(date_str: &str) -> String {
    match date_str.parse::<DateTime<Utc>>() {
        Ok(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(_) => date_str.to_string(),
    }
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
