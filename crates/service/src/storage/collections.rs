use std::collections::BTreeMap;

use models::{Collection, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::patch::UpdateInstruction;

/// In-process state of all collections, kept in insertion order.
/// Shared by the memory and JSON-file stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    documents: BTreeMap<Collection, Vec<Document>>,
}

impl Collections {
    pub fn find_by_id(&self, collection: Collection, id: &str) -> Option<Document> {
        self.documents.get(&collection)?.iter().find(|d| d.id == id).cloned()
    }

    pub fn find(&self, collection: Collection, parent_id: Option<&str>) -> Vec<Document> {
        let Some(docs) = self.documents.get(&collection) else { return Vec::new() };
        match (collection.parent_field(), parent_id) {
            (Some(field), Some(parent)) => docs
                .iter()
                .filter(|d| d.reference(field).as_deref() == Some(parent))
                .cloned()
                .collect(),
            _ => docs.clone(),
        }
    }

    pub fn insert(&mut self, collection: Collection, id: String, fields: Map<String, Value>) -> Document {
        let doc = Document::new(id, fields);
        self.documents.entry(collection).or_default().push(doc.clone());
        doc
    }

    pub fn update(&mut self, collection: Collection, id: &str, update: &UpdateInstruction) -> Option<Document> {
        let doc = self.documents.get_mut(&collection)?.iter_mut().find(|d| d.id == id)?;
        update.apply(&mut doc.fields);
        Some(doc.clone())
    }

    pub fn remove(&mut self, collection: Collection, id: &str) -> Option<Document> {
        let docs = self.documents.get_mut(&collection)?;
        let pos = docs.iter().position(|d| d.id == id)?;
        Some(docs.remove(pos))
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.documents.get(&collection).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn parent_filter_matches_exactly() {
        let mut c = Collections::default();
        c.insert(Collection::Tasks, "t1".into(), fields(json!({"name": "a", "groupId": "g1"})));
        c.insert(Collection::Tasks, "t2".into(), fields(json!({"name": "b", "groupId": "g2"})));
        c.insert(Collection::Tasks, "t3".into(), fields(json!({"name": "c", "groupId": {"_id": "g1"}})));

        let ids: Vec<_> = c.find(Collection::Tasks, Some("g1")).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert_eq!(c.find(Collection::Tasks, None).len(), 3);
        assert!(c.find(Collection::Tasks, Some("g")).is_empty());
    }

    #[test]
    fn collections_are_isolated() {
        let mut c = Collections::default();
        c.insert(Collection::Groups, "x".into(), fields(json!({"name": "g"})));
        assert!(c.find_by_id(Collection::Tasks, "x").is_none());
        assert!(c.remove(Collection::Milestones, "x").is_none());
        assert_eq!(c.len(Collection::Groups), 1);
    }

    #[test]
    fn serializes_with_collection_names_as_keys() {
        let mut c = Collections::default();
        c.insert(Collection::Milestones, "m1".into(), fields(json!({"name": "m", "taskId": "t"})));
        let json = serde_json::to_value(&c).unwrap();
        assert!(json["documents"]["milestones"].is_array());
        let back: Collections = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
