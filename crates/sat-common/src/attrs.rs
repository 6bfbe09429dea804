//! Attribute values and the ordered attribute mapping carried by arrays.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered attribute mapping. Iteration order is the key order.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Attribute keys used across readers and compositors.
pub mod keys {
    // Array identity
    pub const NAME: &str = "name";
    pub const STANDARD_NAME: &str = "standard_name";
    pub const UNITS: &str = "units";
    pub const TYPE: &str = "type";

    // Observation metadata
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const PLATFORM_NAME: &str = "platform_name";
    pub const SENSOR: &str = "sensor";
    pub const CREATION_TIME: &str = "creation_time";

    // Channel metadata
    pub const FREQUENCY_GHZ: &str = "frequency_ghz";
    pub const POLARIZATION: &str = "polarization";

    // Composite metadata
    pub const MODE: &str = "mode";
    pub const PREREQUISITES: &str = "prerequisites";
}

/// A single attribute value.
///
/// Deserialization is untagged, so a YAML/JSON string that parses as an
/// ISO-8601 datetime becomes [`AttrValue::DateTime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    DateTime(NaiveDateTime),
    Int(i64),
    Float(f64),
    Str(String),
    FloatList(Vec<f64>),
    StrList(Vec<String>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            AttrValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::FloatList(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AttrValue::StrList(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Float(value as f64)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value as i64)
    }
}

impl From<NaiveDateTime> for AttrValue {
    fn from(value: NaiveDateTime) -> Self {
        AttrValue::DateTime(value)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(value: Vec<f64>) -> Self {
        AttrValue::FloatList(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::StrList(value)
    }
}

/// Render an attribute mapping as a JSON object.
pub fn to_json(attrs: &Attributes) -> serde_json::Value {
    serde_json::to_value(attrs).unwrap_or(serde_json::Value::Null)
}
