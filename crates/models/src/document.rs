use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::ModelError, record::{self, Collection}};

/// One row per stored document. `parent_id` mirrors the collection's parent
/// reference so child lookups can filter in SQL; `body` holds every field.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub collection: String,
    pub parent_id: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for record::Document {
    type Error = ModelError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        match row.body {
            Value::Object(fields) => Ok(record::Document::new(row.id, fields)),
            other => Err(ModelError::Codec(format!("document {} body is not an object: {other}", row.id))),
        }
    }
}

/// Build the row for a document in `collection`.
pub fn to_active_model(collection: Collection, doc: &record::Document) -> ActiveModel {
    ActiveModel {
        id: Set(doc.id.clone()),
        collection: Set(collection.name().to_string()),
        parent_id: Set(collection.parent_field().and_then(|f| doc.reference(f))),
        body: Set(Value::Object(doc.fields.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_model_mirrors_parent_reference() {
        let Value::Object(fields) = json!({"name": "n", "taskId": {"_id": "t9"}}) else { unreachable!() };
        let doc = record::Document::new("m1", fields);
        let am = to_active_model(Collection::Milestones, &doc);
        assert_eq!(am.parent_id, Set(Some("t9".to_string())));
        assert_eq!(am.collection, Set("milestones".to_string()));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let row = Model { id: "x".into(), collection: "groups".into(), parent_id: None, body: json!([1, 2]) };
        assert!(record::Document::try_from(row).is_err());
    }
}
