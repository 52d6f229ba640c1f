use pretty_assertions::assert_eq;
use serde_json::json;
use skyops_schema::{FieldType, SchemaError, SchemaRegistry};
use skyops_types::EntityKind;
use std::io::Write;

fn tenant_document() -> serde_json::Value {
    json!({
        "vehicles": {
            "serial_number": {"type": "String", "required": true}
        },
        "user": {
            "phone": {"type": "String"},
            "birth_date": {"type": "Date", "required": true}
        },
        "documents": {
            "number": {"type": "String"}
        },
        "starships": {
            "warp": {"type": "Number"}
        }
    })
}

#[test]
fn unloaded_registry_returns_empty_schemas() {
    let registry = SchemaRegistry::new();
    assert!(!registry.is_loaded());
    for kind in EntityKind::ALL {
        assert!(registry.schema(kind).is_empty());
    }
}

#[test]
fn document_is_keyed_by_kind_with_aliases() {
    let registry = SchemaRegistry::from_document(&tenant_document()).unwrap();
    assert!(registry.is_loaded());

    let vehicle = registry.schema(EntityKind::Vehicle);
    assert_eq!(vehicle.field_type("serial_number"), Some(FieldType::String));
    assert!(vehicle.field("serial_number").unwrap().required);

    let user = registry.schema(EntityKind::User);
    assert_eq!(user.len(), 2);
    assert_eq!(user.field_type("birth_date"), Some(FieldType::Date));

    assert_eq!(registry.schema(EntityKind::Document).len(), 1);
}

#[test]
fn unknown_kinds_are_skipped() {
    let registry = SchemaRegistry::from_document(&tenant_document()).unwrap();
    assert_eq!(registry.kinds().count(), 3);
}

#[test]
fn kinds_without_schema_are_empty() {
    let registry = SchemaRegistry::from_document(&tenant_document()).unwrap();
    assert!(registry.schema(EntityKind::Operation).is_empty());
}

#[test]
fn non_object_document_is_rejected() {
    let err = SchemaRegistry::from_document(&json!(["vehicle"])).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDocument(_)));
}

#[test]
fn malformed_schema_is_rejected() {
    let document = json!({"vehicle": {"serial_number": {"required": "yes"}}});
    let err = SchemaRegistry::from_document(&document).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDocument(msg) if msg.contains("vehicle")));
}

#[test]
fn from_json_str_rejects_invalid_json() {
    let err = SchemaRegistry::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, SchemaError::Serialization(_)));
}

#[test]
fn load_reads_document_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", tenant_document()).unwrap();

    let registry = SchemaRegistry::load(file.path()).unwrap();
    assert_eq!(registry.schema(EntityKind::Vehicle).len(), 1);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaRegistry::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}
