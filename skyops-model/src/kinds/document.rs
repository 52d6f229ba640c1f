//! Documents attached to other entities.
//!
//! The binary itself never travels in JSON: a locally attached file is held
//! in the `file` field until the client uploads it as multipart content, and
//! the backend reports the stored copy through `downloadFileUrl`.

use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};
use crate::rules::DateOrder;

/// Field holding the backend URL of the stored file.
pub const DOWNLOAD_URL: &str = "downloadFileUrl";
/// Field holding a locally attached file.
pub const FILE: &str = "file";

pub static DOCUMENT: KindDefinition = KindDefinition {
    kind: EntityKind::Document,
    id_key: Some("id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::text("tag").required(),
        FieldSpec::date("valid_from"),
        FieldSpec::date("valid_until"),
        FieldSpec::text("observations"),
        FieldSpec::text("referenced_entity_id").omit_empty(),
        FieldSpec::text("referenced_entity_type").omit_empty(),
        FieldSpec::date("upload_time").computed(),
        FieldSpec::boolean("valid").computed(),
        FieldSpec::text(DOWNLOAD_URL).computed(),
        FieldSpec::file(FILE).local(),
    ],
    rules: &[&DateOrder {
        begin: "valid_from",
        end: "valid_until",
    }],
    accepts_extra_fields: true,
    has_documents: false,
    display_name,
};

fn display_name(document: &Entity) -> String {
    match document.get_str("name").map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => super::text_or_id(document, "tag"),
    }
}
