//! Ordered JSON object builder

use oaslice_common::Extensions;
use serde_json::{Map, Value};

/// Insert-order JSON object that skips absent and default values
#[derive(Debug, Default)]
pub(crate) struct Object {
    map: Map<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.map.insert(key.to_string(), value.into());
    }

    pub fn opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn string(&mut self, key: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.set(key, value.as_str());
        }
    }

    /// Only `true` is written; `false` is every boolean's default
    pub fn flag(&mut self, key: &str, value: bool) {
        if value {
            self.set(key, true);
        }
    }

    /// Skips empty arrays and empty objects
    pub fn non_empty(&mut self, key: &str, value: Value) {
        let empty = match &value {
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        };
        if !empty {
            self.set(key, value);
        }
    }

    pub fn strings(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.set(key, values.to_vec());
        }
    }

    pub fn extensions(&mut self, extensions: &Extensions) {
        for (key, value) in extensions {
            self.map.insert(key.clone(), value.clone());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.shift_remove(key)
    }

    pub fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

/// Collect `(key, value)` pairs into an ordered object
pub(crate) fn object_of<'a, I>(entries: I) -> Value
where
    I: IntoIterator<Item = (&'a String, Value)>,
{
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.clone(), value))
            .collect(),
    )
}

/// Append `x-` keys to an object built from an open map
pub(crate) fn with_extensions(value: Value, extensions: &Extensions) -> Value {
    match value {
        Value::Object(mut map) => {
            for (key, value) in extensions {
                map.insert(key.clone(), value.clone());
            }
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skips_defaults() {
        let mut object = Object::new();
        object.set("name", "pet");
        object.flag("required", false);
        object.flag("deprecated", true);
        object.string("description", &None);
        object.non_empty("enum", json!([]));
        object.strings("tags", &[]);
        assert_eq!(object.finish(), json!({"name": "pet", "deprecated": true}));
    }

    #[test]
    fn test_insertion_order() {
        let mut object = Object::new();
        object.set("z", 1);
        object.set("a", 2);
        let text = serde_json::to_string(&object.finish()).unwrap();
        assert_eq!(text, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_extensions_follow_entries() {
        let mut extensions = Extensions::new();
        extensions.insert("x-owner".to_string(), json!("pets-team"));
        let value = with_extensions(json!({"/pets": {}}), &extensions);
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"/pets":{},"x-owner":"pets-team"}"#);
    }
}
