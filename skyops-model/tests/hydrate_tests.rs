use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use skyops_model::{Entity, Value};
use skyops_schema::{FieldDescriptor, FieldValue, FileRef, Schema, SchemaRegistry};
use skyops_types::{EntityId, EntityKind};

fn vehicle_registry() -> SchemaRegistry {
    SchemaRegistry::from_schemas([(
        EntityKind::Vehicle,
        Schema::new()
            .with_field("serial_number", FieldDescriptor::string(true))
            .with_field("weight", FieldDescriptor::number(false))
            .with_field("insured_until", FieldDescriptor::date(false))
            .with_field("photo", FieldDescriptor::file(false)),
    )])
}

// ── Identifiers ──────────────────────────────────────────────────

#[test]
fn identifier_comes_from_kind_id_key() {
    let registry = SchemaRegistry::new();
    let vehicle = Entity::hydrate(EntityKind::Vehicle, &json!({"uvin": "abc"}), &registry);
    assert_eq!(vehicle.id(), &EntityId::persisted("abc"));

    let operation = Entity::hydrate(EntityKind::Operation, &json!({"gufi": "g-1"}), &registry);
    assert_eq!(operation.id().persisted_str(), Some("g-1"));

    let document = Entity::hydrate(EntityKind::Document, &json!({"id": 42}), &registry);
    assert_eq!(document.id().persisted_str(), Some("42"));
}

#[test]
fn missing_null_or_sentinel_identifier_is_new() {
    let registry = SchemaRegistry::new();
    for payload in [
        json!({}),
        json!({"uvin": null}),
        json!({"uvin": ""}),
        json!({"uvin": "__new__"}),
    ] {
        let vehicle = Entity::hydrate(EntityKind::Vehicle, &payload, &registry);
        assert!(vehicle.is_new(), "{payload}");
    }
}

#[test]
fn non_object_payload_hydrates_empty_entity() {
    let registry = SchemaRegistry::new();
    for payload in [json!(null), json!("x"), json!([1, 2])] {
        let vehicle = Entity::hydrate(EntityKind::Vehicle, &payload, &registry);
        assert_eq!(vehicle, Entity::new(EntityKind::Vehicle));
    }
}

// ── Fixed fields ─────────────────────────────────────────────────

#[test]
fn fixed_fields_are_coerced_by_manifest_kind() {
    let volume = Entity::hydrate(
        EntityKind::OperationVolume,
        &json!({
            "ordinal": 0,
            "effective_time_begin": "2024-05-01T10:00:00.000Z",
            "effective_time_end": 1714561200000_i64,
            "min_altitude": "0",
            "max_altitude": 120,
            "beyond_visual_line_of_sight": true,
        }),
        &SchemaRegistry::new(),
    );

    assert_eq!(
        volume.get_date("effective_time_begin"),
        Some(&Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
    );
    assert_eq!(
        volume.get_date("effective_time_end"),
        Some(&Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())
    );
    assert_eq!(volume.get_f64("min_altitude"), Some(0.0));
    assert_eq!(volume.get_f64("max_altitude"), Some(120.0));
    assert_eq!(volume.get_bool("beyond_visual_line_of_sight"), Some(true));
}

#[test]
fn malformed_fixed_values_are_kept_raw() {
    let volume = Entity::hydrate(
        EntityKind::OperationVolume,
        &json!({"max_altitude": "very high", "effective_time_begin": "someday"}),
        &SchemaRegistry::new(),
    );
    assert_eq!(
        volume.get("max_altitude"),
        Some(&Value::Scalar(FieldValue::Raw(json!("very high"))))
    );
    assert_eq!(
        volume.get("effective_time_begin"),
        Some(&Value::Scalar(FieldValue::Raw(json!("someday"))))
    );
}

#[test]
fn null_fixed_values_take_the_default() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({"vehicleName": null, "operators": null}),
        &SchemaRegistry::new(),
    );
    assert_eq!(vehicle.get_str("vehicleName"), Some(""));
    assert_eq!(vehicle.get("operators"), Some(&Value::References(vec![])));
}

#[test]
fn computed_fields_are_hydrated() {
    let operation = Entity::hydrate(
        EntityKind::Operation,
        &json!({"gufi": "g", "submit_time": "2024-01-02T03:04:05.000Z"}),
        &SchemaRegistry::new(),
    );
    assert!(operation.get_date("submit_time").is_some());
}

#[test]
fn local_fields_are_never_hydrated() {
    let user = Entity::hydrate(
        EntityKind::User,
        &json!({"username": "u", "rpassword": "leaked"}),
        &SchemaRegistry::new(),
    );
    assert_eq!(user.get_str("rpassword"), Some(""));
    assert!(user.extra("rpassword").is_none());
}

// ── References and sub-entities ──────────────────────────────────

#[test]
fn references_accept_identifier_or_nested_object() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({
            "uvin": "v1",
            "owner": {"username": "alice", "firstName": "Alice", "lastName": "A"},
            "operators": ["bob", {"username": "carol"}, 17, null],
        }),
        &SchemaRegistry::new(),
    );

    let owner = vehicle.reference("owner").unwrap();
    assert_eq!(owner.identifier(), "alice");
    assert_eq!(owner.entity().map(Entity::display_name).as_deref(), Some("Alice A"));

    let operators: Vec<&str> = vehicle
        .get("operators")
        .unwrap()
        .as_references()
        .iter()
        .map(|r| r.identifier())
        .collect();
    assert_eq!(operators, vec!["bob", "carol", "17"]);
}

#[test]
fn nested_reference_without_identifier_is_kept_raw() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({"owner": {"firstName": "nobody"}}),
        &SchemaRegistry::new(),
    );
    assert_eq!(
        vehicle.get("owner"),
        Some(&Value::Json(json!({"firstName": "nobody"})))
    );
}

#[test]
fn owned_sub_entities_are_hydrated_recursively() {
    let operation = Entity::hydrate(
        EntityKind::Operation,
        &json!({
            "gufi": "g",
            "operation_volumes": [
                {"ordinal": 0, "max_altitude": 50},
                {"ordinal": 1, "max_altitude": 60},
            ],
        }),
        &SchemaRegistry::new(),
    );

    let volumes = operation.entities("operation_volumes");
    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[1].kind(), EntityKind::OperationVolume);
    assert_eq!(volumes[1].get_f64("max_altitude"), Some(60.0));
}

// ── Extra fields ─────────────────────────────────────────────────

#[test]
fn unknown_top_level_keys_become_typed_extra_fields() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({
            "uvin": "v1",
            "serial_number": "SN-1",
            "weight": "2.5",
            "insured_until": "2025-01-01",
            "photo": "https://files/photo.jpg",
            "colour": "red",
        }),
        &vehicle_registry(),
    );

    assert_eq!(vehicle.extra("serial_number"), Some(&FieldValue::from("SN-1")));
    assert_eq!(vehicle.extra("weight"), Some(&FieldValue::Number(2.5)));
    assert_eq!(
        vehicle.extra("insured_until"),
        Some(&FieldValue::Date(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()))
    );
    assert_eq!(
        vehicle.extra("photo"),
        Some(&FieldValue::File(FileRef::Remote("https://files/photo.jpg".into())))
    );
    // Not in the schema: kept raw.
    assert_eq!(vehicle.extra("colour"), Some(&FieldValue::Raw(json!("red"))));
}

#[test]
fn nested_extra_fields_object_is_flattened() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({"uvin": "v1", "extra_fields": {"serial_number": "SN-2", "_cache": 1}}),
        &vehicle_registry(),
    );
    assert_eq!(vehicle.extra("serial_number"), Some(&FieldValue::from("SN-2")));
    assert!(vehicle.extra("extra_fields").is_none());
    assert!(vehicle.extra("_cache").is_none());
}

#[test]
fn internal_keys_are_dropped() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({"uvin": "v1", "_links": {"self": "/vehicle/v1"}}),
        &SchemaRegistry::new(),
    );
    assert!(vehicle.extra_fields().is_empty());
}

#[test]
fn embedded_kinds_drop_unknown_keys() {
    let volume = Entity::hydrate(
        EntityKind::OperationVolume,
        &json!({"ordinal": 0, "colour": "red", "extra_fields": {"a": 1}}),
        &SchemaRegistry::new(),
    );
    assert!(volume.extra_fields().is_empty());
}

#[test]
fn documents_are_read_from_extra_fields() {
    let operation = Entity::hydrate(
        EntityKind::Operation,
        &json!({
            "gufi": "g",
            "extra_fields": {
                "documents": [
                    {"id": "d1", "tag": "insurance", "downloadFileUrl": "https://files/d1"},
                    {"id": "d2", "tag": "permit"},
                    "not-a-document",
                ],
            },
        }),
        &SchemaRegistry::new(),
    );

    let documents = operation.documents();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].kind(), EntityKind::Document);
    assert_eq!(documents[0].id().persisted_str(), Some("d1"));
    assert!(documents[0].has_content());
    assert!(!documents[1].has_content());
    assert!(operation.extra("documents").is_none());
}

#[test]
fn top_level_documents_are_hydrated_like_nested_ones() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({"uvin": "v1", "documents": [{"id": "d1", "tag": "insurance"}]}),
        &SchemaRegistry::new(),
    );
    assert_eq!(vehicle.documents().len(), 1);
    assert_eq!(vehicle.documents()[0].get_str("tag"), Some("insurance"));
    assert!(vehicle.extra("documents").is_none());

    // Kinds without documents keep the key as an ordinary extra field.
    let tracker = Entity::hydrate(
        EntityKind::Tracker,
        &json!({"id": "t1", "documents": [{"id": "d1"}]}),
        &SchemaRegistry::new(),
    );
    assert!(tracker.documents().is_empty());
    assert!(tracker.extra("documents").is_some());
}

#[test]
fn blank_choices_hydrate_unset() {
    let operation = Entity::hydrate(
        EntityKind::Operation,
        &json!({"gufi": "g", "state": " "}),
        &SchemaRegistry::new(),
    );
    assert_eq!(operation.get("state"), Some(&Value::Unset));
    assert_eq!(Entity::new(EntityKind::Operation).get("state"), Some(&Value::Unset));
}

#[test]
fn hydrated_entity_has_no_changes() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({"uvin": "v1", "vehicleName": "X", "class": "VTOL"}),
        &SchemaRegistry::new(),
    );
    assert!(vehicle.changed_fields().is_empty());
}
