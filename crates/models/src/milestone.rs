use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, record::Document};

/// Milestone as returned to callers. Unlike a task, `finished` stays absent
/// until something sets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    pub task_id: String,
}

impl TryFrom<&Document> for MilestoneDto {
    type Error = ModelError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id.clone(),
            name: doc.required_str("name")?,
            description: doc.present_str("description"),
            finished: doc.bool_field("finished"),
            task_id: doc.required_reference("taskId")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_finished_is_omitted() {
        let serde_json::Value::Object(fields) = json!({"name": "Draft outline", "taskId": "T1"}) else { unreachable!() };
        let dto = MilestoneDto::try_from(&Document::new("m1", fields)).unwrap();
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"id": "m1", "name": "Draft outline", "taskId": "T1"})
        );
    }
}
