//! Node identifiers and property payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open-ended property mapping carried by nodes and edges.
pub type Properties = serde_json::Map<String, Value>;

/// Value stored under the identifier property of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl NodeId {
    /// Read an identifier out of a returned column.
    ///
    /// Returns `None` for nulls, floats and containers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(Self::Int),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for NodeId {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        id.to_value()
    }
}

/// Build a property map from `(name, value)` pairs.
pub fn properties<K, V, I>(pairs: I) -> Properties
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        assert_eq!(NodeId::from_value(&json!("Apple")), Some(NodeId::from("Apple")));
        assert_eq!(NodeId::from_value(&json!(777)), Some(NodeId::Int(777)));
        assert_eq!(NodeId::from_value(&json!(1.5)), None);
        assert_eq!(NodeId::from_value(&Value::Null), None);
    }

    #[test]
    fn test_untagged_serde() {
        let ids: Vec<NodeId> = serde_json::from_str(r#"[1, "two"]"#).unwrap();
        assert_eq!(ids, vec![NodeId::Int(1), NodeId::from("two")]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[1,"two"]"#);
    }

    #[test]
    fn test_properties_helper() {
        let props = properties([("shape", json!("round")), ("average_weight", json!(100))]);
        assert_eq!(props.get("shape"), Some(&json!("round")));
        assert_eq!(props.len(), 2);
    }
}
