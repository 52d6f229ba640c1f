use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};
use crate::rules::FieldsMatch;

pub const ROLES: &[&str] = &["ADMIN", "PILOT", "MONITOR", "REMOTE_SENSOR"];

pub static USER: KindDefinition = KindDefinition {
    kind: EntityKind::User,
    id_key: Some("id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("username").required().length(3, 64),
        FieldSpec::text("firstName").required(),
        FieldSpec::text("lastName").required(),
        FieldSpec::email("email").required(),
        FieldSpec::choice("role", ROLES).required(),
        // Write-only: sent when set, never returned by the backend.
        FieldSpec::text("password").omit_empty().min_length(8),
        FieldSpec::text("rpassword").local(),
        FieldSpec::boolean("verified").computed(),
        FieldSpec::boolean("disabled").computed(),
    ],
    rules: &[&FieldsMatch {
        field: "password",
        confirmation: "rpassword",
    }],
    accepts_extra_fields: true,
    has_documents: true,
    display_name,
};

fn display_name(user: &Entity) -> String {
    let first = user.get_str("firstName").unwrap_or_default().trim();
    let last = user.get_str("lastName").unwrap_or_default().trim();
    let full = format!("{first} {last}");
    let full = full.trim();
    if full.is_empty() {
        super::text_or_id(user, "username")
    } else {
        full.to_string()
    }
}
