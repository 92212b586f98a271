use models::{milestone::MilestoneDto, Collection};

use super::{Resource, ResourceService};
use crate::validation::{FieldRule, Schema};

// `finished` is accepted on create but never defaulted, unlike tasks.
const CREATE: Schema = Schema::new(&[
    FieldRule::string("name", 200).required(),
    FieldRule::text("description", 2000),
    FieldRule::boolean("finished"),
]);

const UPDATE: Schema = Schema::new(&[
    FieldRule::string("name", 200),
    FieldRule::text("description", 2000).nullable(),
    FieldRule::boolean("finished"),
]);

pub struct Milestone;

impl Resource for Milestone {
    type Dto = MilestoneDto;

    const COLLECTION: Collection = Collection::Milestones;
    const ENTITY: &'static str = "milestone";

    fn create_schema() -> &'static Schema { &CREATE }
    fn update_schema() -> &'static Schema { &UPDATE }
}

pub type MilestoneService = ResourceService<Milestone>;
