use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, record::Document};

/// Task as returned to callers. `finished` is always present; it defaults to
/// `false` when the stored document never set it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub finished: bool,
    pub group_id: String,
}

impl TryFrom<&Document> for TaskDto {
    type Error = ModelError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id.clone(),
            name: doc.required_str("name")?,
            description: doc.present_str("description"),
            priority: doc.present_i64("priority"),
            expires_at: doc.present_str("expiresAt"),
            finished: doc.bool_field("finished").unwrap_or(false),
            group_id: doc.required_reference("groupId")?,
        })
    }
}
