use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use skyops_model::{Entity, ErrorDescriptor, Geometry, RuleKind, SerializeOptions, Value};
use skyops_schema::{FieldDescriptor, Schema, SchemaRegistry};
use skyops_types::EntityKind;

fn serial_number_registry() -> SchemaRegistry {
    SchemaRegistry::from_schemas([(
        EntityKind::Vehicle,
        Schema::new().with_field("serial_number", FieldDescriptor::string(true)),
    )])
}

fn described_vehicle() -> Entity {
    let mut vehicle = Entity::new(EntityKind::Vehicle);
    vehicle.set("vehicleName", "Falcon").unwrap();
    vehicle.set("manufacturer", "DJI").unwrap();
    vehicle.set("model", "M300").unwrap();
    vehicle.set("class", "MULTIROTOR").unwrap();
    vehicle
}

fn complete_volume() -> Entity {
    let mut volume = Entity::new(EntityKind::OperationVolume);
    volume
        .set("effective_time_begin", Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        .unwrap();
    volume
        .set("effective_time_end", Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())
        .unwrap();
    volume.set("min_altitude", 0.0).unwrap();
    volume.set("max_altitude", 120.0).unwrap();
    volume
        .set(
            "operation_geography",
            Geometry::polygon(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]),
        )
        .unwrap();
    volume
}

fn rules_for(errors: &[ErrorDescriptor], field: &str) -> Vec<RuleKind> {
    errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| e.rule)
        .collect()
}

// ── Required extra fields ────────────────────────────────────────

#[test]
fn vehicle_with_required_extra_field() {
    let registry = serial_number_registry();
    let mut vehicle = described_vehicle();

    assert_eq!(
        vehicle.validate(&registry),
        vec![ErrorDescriptor::new("serial_number", RuleKind::Required)]
    );

    vehicle.set_extra("serial_number", "SN-1").unwrap();
    assert!(vehicle.validate(&registry).is_empty());

    let body = vehicle.as_backend_format(&SerializeOptions::default()).unwrap();
    assert!(body.get("uvin").is_none());
    assert_eq!(body["extra_fields"]["serial_number"], json!("SN-1"));
}

#[test]
fn blank_required_extra_is_missing() {
    let registry = serial_number_registry();
    let mut vehicle = described_vehicle();
    vehicle.set_extra("serial_number", "   ").unwrap();
    assert_eq!(rules_for(&vehicle.validate(&registry), "serial_number"), vec![RuleKind::Required]);
}

#[test]
fn extra_field_type_mismatch() {
    let registry = SchemaRegistry::from_schemas([(
        EntityKind::Vehicle,
        Schema::new().with_field("weight", FieldDescriptor::number(false)),
    )]);
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({
            "vehicleName": "X", "manufacturer": "Y", "model": "Z", "class": "VTOL",
            "weight": "heavy",
        }),
        &registry,
    );

    let errors = vehicle.validate(&registry);
    assert_eq!(
        errors,
        vec![ErrorDescriptor::new("weight", RuleKind::Type).with_arg("expected", "Number")]
    );
}

#[test]
fn unknown_declared_type_is_not_type_checked_but_still_required() {
    let registry = SchemaRegistry::from_json_str(
        r#"{"vehicle": {"payload": {"type": "Polygon", "required": true}}}"#,
    )
    .unwrap();

    let mut vehicle = described_vehicle();
    assert_eq!(rules_for(&vehicle.validate(&registry), "payload"), vec![RuleKind::Required]);

    vehicle.set_extra("payload", 3.0).unwrap();
    assert!(vehicle.validate(&registry).is_empty());
}

#[test]
fn extra_field_length_limits() {
    let registry = SchemaRegistry::from_schemas([(
        EntityKind::Vehicle,
        Schema::new().with_field(
            "serial_number",
            FieldDescriptor::string(false).with_length(Some(4), Some(6)),
        ),
    )]);
    let mut vehicle = described_vehicle();

    vehicle.set_extra("serial_number", "abc").unwrap();
    assert_eq!(rules_for(&vehicle.validate(&registry), "serial_number"), vec![RuleKind::MinLength]);

    vehicle.set_extra("serial_number", "abcdefg").unwrap();
    assert_eq!(rules_for(&vehicle.validate(&registry), "serial_number"), vec![RuleKind::MaxLength]);

    vehicle.set_extra("serial_number", "abcde").unwrap();
    assert!(vehicle.validate(&registry).is_empty());
}

proptest! {
    #[test]
    fn each_missing_required_field_yields_exactly_one_descriptor(
        names in proptest::collection::btree_set("[a-z]{1,8}_x", 1..6),
    ) {
        let schema = names
            .iter()
            .fold(Schema::new(), |s, n| s.with_field(n.clone(), FieldDescriptor::string(true)));
        let registry = SchemaRegistry::from_schemas([(EntityKind::Vehicle, schema)]);

        let errors = described_vehicle().validate(&registry);
        prop_assert_eq!(errors.len(), names.len());
        for name in &names {
            prop_assert_eq!(rules_for(&errors, name), vec![RuleKind::Required]);
        }
    }
}

// ── Fixed fields ─────────────────────────────────────────────────

#[test]
fn missing_required_fixed_fields() {
    let errors = Entity::new(EntityKind::Vehicle).validate(&SchemaRegistry::new());
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["vehicleName", "manufacturer", "model", "class"]);
    assert!(errors.iter().all(|e| e.rule == RuleKind::Required));
}

#[test]
fn computed_fields_are_not_validated() {
    let vehicle = Entity::hydrate(
        EntityKind::Vehicle,
        &json!({
            "vehicleName": "X", "manufacturer": "Y", "model": "Z", "class": "VTOL",
            "authorized": "MAYBE",
        }),
        &SchemaRegistry::new(),
    );
    assert!(vehicle.validate(&SchemaRegistry::new()).is_empty());
}

#[test]
fn choice_email_and_length_rules() {
    let mut user = Entity::new(EntityKind::User);
    user.set("username", "jd").unwrap();
    user.set("firstName", "Jane").unwrap();
    user.set("lastName", "Doe").unwrap();
    user.set("email", "not-an-email").unwrap();
    user.set("role", "OWNER").unwrap();

    let errors = user.validate(&SchemaRegistry::new());
    assert_eq!(rules_for(&errors, "username"), vec![RuleKind::MinLength]);
    assert_eq!(rules_for(&errors, "email"), vec![RuleKind::Email]);
    assert_eq!(rules_for(&errors, "role"), vec![RuleKind::Choice]);

    user.set("username", "jdoe").unwrap();
    user.set("email", "jane@example.com").unwrap();
    user.set("role", "PILOT").unwrap();
    assert!(user.validate(&SchemaRegistry::new()).is_empty());
}

#[test]
fn password_confirmation_must_match() {
    let mut user = Entity::new(EntityKind::User);
    user.set("password", "correct horse").unwrap();
    user.set("rpassword", "correct h0rse").unwrap();

    let errors = user.validate(&SchemaRegistry::new());
    let mismatch: Vec<&ErrorDescriptor> =
        errors.iter().filter(|e| e.rule == RuleKind::Mismatch).collect();
    assert_eq!(mismatch.len(), 1);
    assert_eq!(mismatch[0].field, "rpassword");
    assert_eq!(mismatch[0].args["other"], json!("password"));
}

#[test]
fn numeric_range() {
    let mut coordinator = Entity::new(EntityKind::Coordinator);
    coordinator.set("discount_multiple_dates", 120.0).unwrap();
    coordinator.set("price", -1.0).unwrap();

    let errors = coordinator.validate(&SchemaRegistry::new());
    assert_eq!(rules_for(&errors, "discount_multiple_dates"), vec![RuleKind::Range]);
    assert_eq!(rules_for(&errors, "price"), vec![RuleKind::Range]);
}

#[test]
fn malformed_hydrated_value_reports_type() {
    let volume = Entity::hydrate(
        EntityKind::OperationVolume,
        &json!({"max_altitude": "very high"}),
        &SchemaRegistry::new(),
    );
    let errors = volume.validate(&SchemaRegistry::new());
    assert_eq!(rules_for(&errors, "max_altitude"), vec![RuleKind::Type]);
}

#[test]
fn segment_points_must_be_points() {
    let mut segment = Entity::new(EntityKind::Segment);
    segment.set("start", Geometry::point(0.0, 0.0)).unwrap();
    segment.set("end", Geometry::new(json!({"type": "Point"}))).unwrap();

    let errors = segment.validate(&SchemaRegistry::new());
    assert!(rules_for(&errors, "start").is_empty());
    assert_eq!(rules_for(&errors, "end"), vec![RuleKind::Geometry]);
}

// ── Cross-field rules ────────────────────────────────────────────

#[test]
fn polygon_needs_three_distinct_points() {
    let registry = SchemaRegistry::new();
    let mut volume = complete_volume();

    volume
        .set("operation_geography", Geometry::polygon(&[[0.0, 0.0], [1.0, 1.0]]))
        .unwrap();
    assert_eq!(
        rules_for(&volume.validate(&registry), "operation_geography"),
        vec![RuleKind::Geometry]
    );

    volume
        .set(
            "operation_geography",
            Geometry::polygon(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]),
        )
        .unwrap();
    assert!(rules_for(&volume.validate(&registry), "operation_geography").is_empty());
}

#[test]
fn volume_begin_must_precede_end() {
    let mut volume = complete_volume();
    volume
        .set("effective_time_begin", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        .unwrap();

    let errors = volume.validate(&SchemaRegistry::new());
    assert_eq!(
        errors,
        vec![
            ErrorDescriptor::new("effective_time_begin", RuleKind::TimeOrder)
                .with_arg("end", "effective_time_end")
        ]
    );
}

#[test]
fn altitudes_must_be_ordered() {
    let mut volume = complete_volume();
    volume.set("min_altitude", 200.0).unwrap();
    let errors = volume.validate(&SchemaRegistry::new());
    assert_eq!(rules_for(&errors, "min_altitude"), vec![RuleKind::NumberOrder]);
}

#[test]
fn new_operation_must_start_in_an_initial_state() {
    let mut operation = Entity::new(EntityKind::Operation);
    operation.set("name", "Survey").unwrap();
    operation.set("operation_volumes", vec![complete_volume()]).unwrap();

    operation.set("state", "ACTIVATED").unwrap();
    assert_eq!(
        rules_for(&operation.validate(&SchemaRegistry::new()), "state"),
        vec![RuleKind::Transition]
    );

    operation.set("state", "PROPOSED").unwrap();
    assert!(operation.validate(&SchemaRegistry::new()).is_empty());
}

#[test]
fn persisted_operation_moves_along_allowed_transitions() {
    let registry = SchemaRegistry::new();
    let mut operation = Entity::hydrate(
        EntityKind::Operation,
        &json!({"gufi": "g", "name": "Survey", "state": "ACCEPTED"}),
        &registry,
    );
    operation.set("operation_volumes", vec![complete_volume()]).unwrap();

    operation.set("state", "ACTIVATED").unwrap();
    assert!(operation.validate(&registry).is_empty());

    operation.set("state", "PROPOSED").unwrap();
    let errors = operation.validate(&registry);
    assert_eq!(
        errors,
        vec![
            ErrorDescriptor::new("state", RuleKind::Transition)
                .with_arg("from", "ACCEPTED")
                .with_arg("to", "PROPOSED")
        ]
    );
}

// ── Nested entities ──────────────────────────────────────────────

#[test]
fn volume_errors_are_reported_with_their_path() {
    let mut operation = Entity::new(EntityKind::Operation);
    operation.set("name", "Survey").unwrap();
    let mut broken = complete_volume();
    broken.set("max_altitude", Value::Unset).unwrap();
    operation
        .set("operation_volumes", vec![complete_volume(), broken])
        .unwrap();

    assert_eq!(
        operation.validate(&SchemaRegistry::new()),
        vec![ErrorDescriptor::new("operation_volumes[1].max_altitude", RuleKind::Required)]
    );
}

#[test]
fn empty_required_volume_list_is_missing() {
    let mut operation = Entity::new(EntityKind::Operation);
    operation.set("name", "Survey").unwrap();
    assert_eq!(
        operation.validate(&SchemaRegistry::new()),
        vec![ErrorDescriptor::new("operation_volumes", RuleKind::Required)]
    );
}

#[test]
fn document_errors_are_reported_with_their_path() {
    let mut vehicle = described_vehicle();
    vehicle.add_document(Entity::new(EntityKind::Document)).unwrap();
    assert_eq!(
        vehicle.validate(&SchemaRegistry::new()),
        vec![ErrorDescriptor::new("documents[0].tag", RuleKind::Required)]
    );
}

#[test]
fn descriptors_serialize_for_the_ui() {
    let descriptor = ErrorDescriptor::new("max_altitude", RuleKind::Range).with_arg("max", 400.0);
    assert_eq!(
        serde_json::to_value(&descriptor).unwrap(),
        json!({"field": "max_altitude", "rule": "range", "args": {"max": 400.0}})
    );
    assert_eq!(
        serde_json::to_value(ErrorDescriptor::new("name", RuleKind::Required)).unwrap(),
        json!({"field": "name", "rule": "required"})
    );
}
