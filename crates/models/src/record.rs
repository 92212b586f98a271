use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// The three document collections. Each service owns exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Groups,
    Tasks,
    Milestones,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Groups, Collection::Tasks, Collection::Milestones];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Groups => "groups",
            Collection::Tasks => "tasks",
            Collection::Milestones => "milestones",
        }
    }

    /// Field on a child document that holds its parent's id.
    pub fn parent_field(self) -> Option<&'static str> {
        match self {
            Collection::Groups => None,
            Collection::Tasks => Some("groupId"),
            Collection::Milestones => Some("taskId"),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groups" => Ok(Collection::Groups),
            "tasks" => Ok(Collection::Tasks),
            "milestones" => Ok(Collection::Milestones),
            other => Err(ModelError::Codec(format!("unknown collection '{other}'"))),
        }
    }
}

/// A stored document: store-assigned id plus its field map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Required string field; absence means the document is corrupt.
    pub fn required_str(&self, key: &str) -> Result<String, ModelError> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(ModelError::Codec(format!("document {} has no string '{key}'", self.id))),
        }
    }

    /// Optional string that treats `null` and `""` as absent.
    pub fn present_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Optional integer that treats `null` and `0` as absent.
    pub fn present_i64(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64).filter(|n| *n != 0)
    }

    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Parent reference flattened to a plain id, whether stored as an id or populated.
    pub fn reference(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(reference_id)
    }

    pub fn required_reference(&self, key: &str) -> Result<String, ModelError> {
        self.reference(key)
            .ok_or_else(|| ModelError::Codec(format!("document {} has no reference '{key}'", self.id)))
    }
}

/// Flatten a reference value to its id.
///
/// Accepts a bare id string, or a populated object carrying `_id` or `id`.
pub fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("_id").or_else(|| obj.get("id")).and_then(reference_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: Value) -> Document {
        let Value::Object(map) = fields else { panic!("object expected") };
        Document::new("d1", map)
    }

    #[test]
    fn reference_flattens_populated_and_plain_forms() {
        let d = doc(json!({
            "plain": "g1",
            "mongo": {"_id": "g2", "name": "Home"},
            "nested": {"id": {"_id": "g3"}},
            "broken": true,
        }));
        assert_eq!(d.reference("plain").as_deref(), Some("g1"));
        assert_eq!(d.reference("mongo").as_deref(), Some("g2"));
        assert_eq!(d.reference("nested").as_deref(), Some("g3"));
        assert_eq!(d.reference("broken"), None);
        assert_eq!(d.reference("missing"), None);
    }

    #[test]
    fn falsy_optionals_are_absent() {
        let d = doc(json!({"a": "", "b": null, "c": 0, "d": 7, "e": "x"}));
        assert_eq!(d.present_str("a"), None);
        assert_eq!(d.present_str("b"), None);
        assert_eq!(d.present_i64("c"), None);
        assert_eq!(d.present_i64("d"), Some(7));
        assert_eq!(d.present_str("e").as_deref(), Some("x"));
    }

    #[test]
    fn collection_names_round_trip() {
        for c in Collection::ALL {
            assert_eq!(c.name().parse::<Collection>().unwrap(), c);
        }
        assert!("users".parse::<Collection>().is_err());
        assert_eq!(Collection::Tasks.parent_field(), Some("groupId"));
        assert_eq!(Collection::Groups.parent_field(), None);
    }
}
