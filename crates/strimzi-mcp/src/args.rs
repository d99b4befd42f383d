//! Tool call arguments.

use serde_json::{Map, Value};

/// Untyped arguments of a single tool call.
///
/// Accessors never fail on missing or mistyped data; each tool decides
/// whether an absent value is an error or a cue to apply a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments(Map<String, Value>);

impl CallArguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value for `key`. Numbers and booleans are rendered as text.
    pub fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Like [`CallArguments::string`], with empty strings treated as absent.
    pub fn non_empty_string(&self, key: &str) -> Option<String> {
        self.string(key).filter(|s| !s.trim().is_empty())
    }

    /// Integer value for `key`, or `default` when missing or not numeric.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.optional_int(key).unwrap_or(default)
    }

    /// Integer value for `key`; `None` only when missing or not numeric.
    ///
    /// Floats are truncated and numeric strings are parsed, so an explicit
    /// `0` stays distinguishable from an unset value.
    pub fn optional_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        }
    }

    /// Boolean value for `key`, or `default`.
    ///
    /// The numbers `1` and `0` count as booleans, like their string forms.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => true,
                Some(0) => false,
                _ => default,
            },
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Nested mapping for `key`.
    pub fn map(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key)?.as_object()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Value> for CallArguments {
    /// Anything other than a JSON object yields empty arguments.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<Option<Value>> for CallArguments {
    fn from(value: Option<Value>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for CallArguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> CallArguments {
        CallArguments::from(value)
    }

    #[test]
    fn test_string_accessor() {
        let a = args(json!({"name": "orders", "port": 9092, "tls": true, "nothing": null}));
        assert_eq!(a.string("name").as_deref(), Some("orders"));
        assert_eq!(a.string("port").as_deref(), Some("9092"));
        assert_eq!(a.string("tls").as_deref(), Some("true"));
        assert_eq!(a.string("missing"), None);
        assert_eq!(a.string("nothing"), None);
    }

    #[test]
    fn test_non_empty_string() {
        let a = args(json!({"namespace": "  ", "name": "orders"}));
        assert_eq!(a.non_empty_string("namespace"), None);
        assert_eq!(a.non_empty_string("name").as_deref(), Some("orders"));
    }

    #[test]
    fn test_int_with_default() {
        let a = args(json!({"partitions": 12, "replicas": "3", "ratio": 2.9, "bad": "x"}));
        assert_eq!(a.int_or("partitions", 1), 12);
        assert_eq!(a.int_or("replicas", 1), 3);
        assert_eq!(a.int_or("ratio", 1), 2);
        assert_eq!(a.int_or("bad", 1), 1);
        assert_eq!(a.int_or("missing", 1), 1);
    }

    #[test]
    fn test_optional_int_distinguishes_zero_from_unset() {
        let a = args(json!({"broker": 0}));
        assert_eq!(a.optional_int("broker"), Some(0));
        assert_eq!(a.optional_int("missing"), None);
    }

    #[test]
    fn test_map_accessor() {
        let a = args(json!({"config": {"retention.ms": "604800000"}, "name": "orders"}));
        let config = a.map("config").unwrap();
        assert_eq!(config["retention.ms"], "604800000");
        assert!(a.map("name").is_none());
        assert!(a.map("missing").is_none());
    }

    #[test]
    fn test_bool_with_default() {
        let a = args(json!({"confirm": true, "dry_run": "no"}));
        assert!(a.bool_or("confirm", false));
        assert!(!a.bool_or("dry_run", true));
        assert!(a.bool_or("missing", true));
    }

    #[test]
    fn test_bool_from_numbers() {
        let a = args(json!({"confirm": 1, "dry_run": 0, "retries": 5, "flag": "1"}));
        assert!(a.bool_or("confirm", false));
        assert!(!a.bool_or("dry_run", true));
        assert!(a.bool_or("retries", true));
        assert!(!a.bool_or("retries", false));
        assert_eq!(a.bool_or("flag", false), a.bool_or("confirm", false));
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(CallArguments::from(json!([1, 2])).as_map().is_empty());
        assert!(CallArguments::from(None).as_map().is_empty());
    }
}
