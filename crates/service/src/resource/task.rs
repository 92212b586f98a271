use models::{task::TaskDto, Collection};
use serde_json::{Map, Value};

use super::{Resource, ResourceService};
use crate::validation::{FieldRule, Schema};

const CREATE: Schema = Schema::new(&[
    FieldRule::string("name", 200).required(),
    FieldRule::text("description", 2000),
    FieldRule::integer("priority", 1, 10),
    FieldRule::future_date("expiresAt"),
]);

const UPDATE: Schema = Schema::new(&[
    FieldRule::string("name", 200),
    FieldRule::text("description", 2000).nullable(),
    FieldRule::integer("priority", 1, 10).nullable(),
    FieldRule::future_date("expiresAt").nullable(),
    FieldRule::boolean("finished"),
]);

/// Task inside a group. `finished` can only be changed by update and starts
/// out `false`.
pub struct Task;

impl Resource for Task {
    type Dto = TaskDto;

    const COLLECTION: Collection = Collection::Tasks;
    const ENTITY: &'static str = "task";

    fn create_schema() -> &'static Schema { &CREATE }
    fn update_schema() -> &'static Schema { &UPDATE }

    fn apply_defaults(fields: &mut Map<String, Value>) {
        fields.entry("finished").or_insert(Value::Bool(false));
    }
}

pub type TaskService = ResourceService<Task>;
