//! Query parameter and header value types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query string parameters. Keys are kept sorted so every rendering is deterministic.
pub type QueryParameters = BTreeMap<String, ParamValue>;

/// HTTP headers keyed by header name.
pub type Headers = BTreeMap<String, String>;

/// A single query parameter value.
///
/// Arrays are sent as repeated `key[]=value` pairs and `Null` as a bare `key`
/// with no value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A key with no value
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Free-form text
    Text(String),
    /// Repeated values for the same key
    Array(Vec<ParamValue>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Bool(value) => write!(f, "{}", value),
            ParamValue::Integer(value) => write!(f, "{}", value),
            ParamValue::Text(value) => f.write_str(value),
            ParamValue::Array(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Flattens parameters into ordered `(name, value)` pairs.
///
/// Array values expand to one `name[]` pair per element; `Null` yields a pair
/// without a value.
pub(crate) fn query_pairs(params: &QueryParameters) -> Vec<(String, Option<String>)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            ParamValue::Null => pairs.push((key.clone(), None)),
            ParamValue::Array(items) => {
                for item in items {
                    pairs.push((format!("{}[]", key), Some(item.to_string())));
                }
            }
            other => pairs.push((key.clone(), Some(other.to_string()))),
        }
    }
    pairs
}

fn encode(component: &str) -> String {
    form_urlencoded::byte_serialize(component.as_bytes()).collect()
}

/// Renders parameters as a key-sorted query string.
///
/// Keys and values are form-encoded before joining, so distinct parameter
/// maps never render to the same string. The `[]` array suffix is appended
/// after encoding the key.
pub(crate) fn canonical_query(params: Option<&QueryParameters>) -> String {
    let Some(params) = params else {
        return String::new();
    };
    let mut rendered = Vec::with_capacity(params.len());
    for (key, value) in params {
        let key = encode(key);
        match value {
            ParamValue::Null => rendered.push(key),
            ParamValue::Array(items) => {
                for item in items {
                    rendered.push(format!("{}[]={}", key, encode(&item.to_string())));
                }
            }
            other => rendered.push(format!("{}={}", key, encode(&other.to_string()))),
        }
    }
    rendered.join("&")
}
