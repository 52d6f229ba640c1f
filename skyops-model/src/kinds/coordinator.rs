use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};
use crate::rules::PolygonShape;

/// A coordinating authority for an area, with its fees.
pub static COORDINATOR: KindDefinition = KindDefinition {
    kind: EntityKind::Coordinator,
    id_key: Some("id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("infrastructure").required(),
        FieldSpec::text("liaison").required(),
        FieldSpec::email("email").required(),
        FieldSpec::text("telephone").required(),
        FieldSpec::number("price").at_least(0.0),
        FieldSpec::number("discount_multiple_dates").range(0.0, 100.0),
        FieldSpec::number("minimum_coordination_days").at_least(0.0),
        FieldSpec::polygon("geography").required(),
    ],
    rules: &[&PolygonShape { field: "geography" }],
    accepts_extra_fields: true,
    has_documents: false,
    display_name,
};

fn display_name(coordinator: &Entity) -> String {
    super::text_or_id(coordinator, "infrastructure")
}
