use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};

pub const CLASSES: &[&str] = &["MULTIROTOR", "FIXEDWING", "VTOL", "OTHER"];
pub const AUTHORIZATION_STATES: &[&str] = &["PENDING", "AUTHORIZED", "NOT_AUTHORIZED"];

pub static VEHICLE: KindDefinition = KindDefinition {
    kind: EntityKind::Vehicle,
    id_key: Some("uvin"),
    owner_key: Some("owner"),
    fields: &[
        FieldSpec::text("vehicleName").required().max_length(255),
        FieldSpec::text("manufacturer").required(),
        FieldSpec::text("model").required(),
        FieldSpec::choice("class", CLASSES).required(),
        FieldSpec::text("trackerId").omit_empty(),
        FieldSpec::reference("owner", EntityKind::User, "username"),
        FieldSpec::references("operators", EntityKind::User, "username"),
        FieldSpec::reference("registeredBy", EntityKind::User, "username").computed(),
        FieldSpec::date("date").computed(),
        FieldSpec::choice("authorized", AUTHORIZATION_STATES).computed(),
    ],
    rules: &[],
    accepts_extra_fields: true,
    has_documents: true,
    display_name,
};

fn display_name(vehicle: &Entity) -> String {
    super::text_or_id(vehicle, "vehicleName")
}
