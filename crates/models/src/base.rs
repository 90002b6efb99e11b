//! Fields shared by every entity and the helpers that keep them immutable.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;

/// Free-form attributes stored alongside the typed fields.
pub type Extra = Map<String, Value>;

/// Keys that no payload may set, on any kind.
pub const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at", "__class__"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseFields {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Current time at microsecond precision, the finest a SQL timestamp keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl BaseFields {
    pub fn new() -> Self {
        let now = now();
        Self { id: Uuid::new_v4().to_string(), created_at: now, updated_at: now }
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl Default for BaseFields {
    fn default() -> Self { Self::new() }
}

/// Drop every key in `keys` from `extra`.
pub fn strip_keys(extra: &mut Extra, keys: &[&str]) {
    for key in keys {
        extra.remove(*key);
    }
}

/// Decode a JSON object payload into a typed input.
///
/// Typed fields decode through [`lenient`], so an object payload only fails
/// here if an input type opts out of it.
pub fn from_payload<T: DeserializeOwned>(payload: Map<String, Value>) -> Result<T, ModelError> {
    serde_json::from_value(Value::Object(payload)).map_err(|e| ModelError::Validation(e.to_string()))
}

/// Field decoders for request payloads. A present key always counts as
/// present, whatever JSON it holds.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through, `null` becomes empty, anything else keeps its
    /// JSON text.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Some(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        }))
    }

    /// Numbers (fractions truncated), numeric strings and booleans; other
    /// values are treated as absent.
    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            Value::Bool(b) => Some(i64::from(b)),
            _ => None,
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

/// Turn a stored JSON column back into an `Extra` map.
pub fn extra_from_json(value: Value) -> Result<Extra, ModelError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Extra::new()),
        other => Err(ModelError::Decode(format!("extra attributes must be an object, got {other}"))),
    }
}
