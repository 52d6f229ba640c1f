use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};
use crate::rules::Transitions;

pub const STATES: &[&str] = &["REQUIRE_APPROVAL", "PENDING", "APPROVED", "REJECTED", "CANCELLED"];
pub const CATEGORIES: &[&str] = &["OPEN", "SPECIFIC", "CERTIFIED"];

const STATE_TRANSITIONS: &[(&str, &str)] = &[
    ("REQUIRE_APPROVAL", "PENDING"),
    ("REQUIRE_APPROVAL", "CANCELLED"),
    ("PENDING", "APPROVED"),
    ("PENDING", "REJECTED"),
    ("PENDING", "CANCELLED"),
    ("APPROVED", "CANCELLED"),
];

pub static FLIGHT_REQUEST: KindDefinition = KindDefinition {
    kind: EntityKind::FlightRequest,
    id_key: Some("id"),
    owner_key: Some("operator"),
    fields: &[
        FieldSpec::text("name").required().max_length(255),
        FieldSpec::choice("state", STATES),
        FieldSpec::choice("flight_category", CATEGORIES),
        FieldSpec::text("flight_comments"),
        FieldSpec::entities("volumes", EntityKind::OperationVolume).required(),
        FieldSpec::references("uavs", EntityKind::Vehicle, "uvin").required(),
        FieldSpec::reference("operator", EntityKind::User, "username"),
        FieldSpec::reference("creator", EntityKind::User, "username").computed(),
        FieldSpec::boolean("paid").computed(),
    ],
    rules: &[&Transitions {
        field: "state",
        initial: &["REQUIRE_APPROVAL", "PENDING"],
        allowed: STATE_TRANSITIONS,
    }],
    accepts_extra_fields: true,
    has_documents: true,
    display_name,
};

fn display_name(request: &Entity) -> String {
    super::text_or_id(request, "name")
}
