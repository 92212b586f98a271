//! Partial-update instructions.
//!
//! A validated patch becomes an [`UpdateInstruction`]: every key present is
//! staged as a `set`, including keys bound to `null`. Nulls are stored as
//! nulls, not removed; DTO mapping already treats a null optional as absent.
//! `unset` is honoured by every store but [`build_update`] never fills it.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateInstruction {
    pub set: Map<String, Value>,
    pub unset: Vec<String>,
}

impl UpdateInstruction {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Apply to a document's fields: sets first, then removals.
    pub fn apply(&self, fields: &mut Map<String, Value>) {
        for (key, value) in &self.set {
            fields.insert(key.clone(), value.clone());
        }
        for key in &self.unset {
            fields.remove(key);
        }
    }
}

pub fn build_update(changes: &Map<String, Value>) -> UpdateInstruction {
    let mut update = UpdateInstruction::default();
    for (key, value) in changes {
        update.set.insert(key.clone(), value.clone());
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn null_is_set_not_unset() {
        let update = build_update(&map(json!({"name": "renamed", "description": null})));
        assert!(update.unset.is_empty());
        assert_eq!(update.set.get("description"), Some(&Value::Null));

        let mut fields = map(json!({"name": "old", "description": "text", "priority": 2}));
        update.apply(&mut fields);
        assert_eq!(fields, map(json!({"name": "renamed", "description": null, "priority": 2})));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let update = build_update(&Map::new());
        assert!(update.is_empty());
        let mut fields = map(json!({"name": "same"}));
        update.apply(&mut fields);
        assert_eq!(fields, map(json!({"name": "same"})));
    }

    #[test]
    fn unset_removes_fields() {
        let update = UpdateInstruction { set: Map::new(), unset: vec!["description".into()] };
        let mut fields = map(json!({"name": "n", "description": "d"}));
        update.apply(&mut fields);
        assert!(!fields.contains_key("description"));
    }
}
