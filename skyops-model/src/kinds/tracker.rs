use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};

pub static TRACKER: KindDefinition = KindDefinition {
    kind: EntityKind::Tracker,
    id_key: Some("id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("hardware_id").required(),
        FieldSpec::reference("vehicle", EntityKind::Vehicle, "uvin"),
        FieldSpec::date("created_at").computed(),
    ],
    rules: &[],
    accepts_extra_fields: true,
    has_documents: false,
    display_name,
};

fn display_name(tracker: &Entity) -> String {
    super::text_or_id(tracker, "hardware_id")
}
