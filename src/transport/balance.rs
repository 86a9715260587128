use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use super::TransportError;
use crate::domain::Balance;

#[derive(Debug, Clone, Deserialize)]
struct BalanceWire {
    #[serde(deserialize_with = "decimal_text")]
    balance: String,
    #[serde(deserialize_with = "decimal_text")]
    point: String,
}

/// Cash amounts arrive as JSON strings or numbers. Numbers are kept as their
/// raw token so `10000.50` never passes through `f64`.
fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let token = raw.get();
    match token.as_bytes().first() {
        Some(b'"') => serde_json::from_str(token).map_err(D::Error::custom),
        Some(b'-' | b'0'..=b'9') => Ok(token.to_owned()),
        _ => Err(D::Error::custom("amount must be a string or a number")),
    }
}

pub fn decode_balance_response(json: &str) -> Result<Balance, TransportError> {
    let wire: BalanceWire = serde_json::from_str(json)?;
    Ok(Balance {
        balance: wire.balance,
        point: wire.point,
    })
}
