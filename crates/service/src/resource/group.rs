use models::{group::GroupDto, Collection};

use super::{Resource, ResourceService};
use crate::validation::{FieldRule, Schema};

const CREATE: Schema = Schema::new(&[
    FieldRule::string("name", 200).required(),
    FieldRule::text("description", 2000),
]);

const UPDATE: Schema = Schema::new(&[
    FieldRule::string("name", 200),
    FieldRule::text("description", 2000).nullable(),
]);

/// Top-level container of tasks.
pub struct Group;

impl Resource for Group {
    type Dto = GroupDto;

    const COLLECTION: Collection = Collection::Groups;
    const ENTITY: &'static str = "group";

    fn create_schema() -> &'static Schema { &CREATE }
    fn update_schema() -> &'static Schema { &UPDATE }
}

pub type GroupService = ResourceService<Group>;
