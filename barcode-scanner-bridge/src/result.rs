use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The payload a native scanner reports on success.
///
/// `cancelled` is `true` when the user backed out of the scanner without reading
/// a symbol; `text` and `format` are empty in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub format: String,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub cancelled: bool,
}

impl ScanResult {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Some hosts send `cancelled` as `0`/`1` instead of a boolean.
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::custom(format!("invalid cancelled flag: {}", n))),
        },
        Value::Null => Ok(false),
        other => Err(de::Error::custom(format!("invalid cancelled flag: {}", other))),
    }
}
