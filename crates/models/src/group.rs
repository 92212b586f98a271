use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, record::Document};

/// Group as returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TryFrom<&Document> for GroupDto {
    type Error = ModelError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id.clone(),
            name: doc.required_str("name")?,
            description: doc.present_str("description"),
        })
    }
}
