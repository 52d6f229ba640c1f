//! Operations and their 4D volumes.

use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};
use crate::rules::{DateOrder, NumberOrder, PolygonShape, Transitions};

pub const STATES: &[&str] = &[
    "PROPOSED",
    "ACCEPTED",
    "NOT_ACCEPTED",
    "PENDING",
    "ACTIVATED",
    "ROGUE",
    "NONCONFORMING",
    "CLOSED",
];

const INITIAL_STATES: &[&str] = &["PROPOSED", "PENDING"];

const STATE_TRANSITIONS: &[(&str, &str)] = &[
    ("PROPOSED", "ACCEPTED"),
    ("PROPOSED", "NOT_ACCEPTED"),
    ("PROPOSED", "PENDING"),
    ("PENDING", "ACCEPTED"),
    ("PENDING", "NOT_ACCEPTED"),
    ("ACCEPTED", "ACTIVATED"),
    ("ACCEPTED", "CLOSED"),
    ("ACTIVATED", "CLOSED"),
    ("ACTIVATED", "NONCONFORMING"),
    ("ACTIVATED", "ROGUE"),
    ("NONCONFORMING", "ACTIVATED"),
    ("NONCONFORMING", "ROGUE"),
    ("NONCONFORMING", "CLOSED"),
    ("ROGUE", "CLOSED"),
];

pub static OPERATION: KindDefinition = KindDefinition {
    kind: EntityKind::Operation,
    id_key: Some("gufi"),
    owner_key: Some("owner"),
    fields: &[
        FieldSpec::text("name").required().max_length(255),
        FieldSpec::choice("state", STATES),
        FieldSpec::reference("owner", EntityKind::User, "username"),
        FieldSpec::text("contact"),
        FieldSpec::text("contact_phone"),
        FieldSpec::text("flight_comments"),
        FieldSpec::text("volumes_description"),
        FieldSpec::text("flight_number"),
        FieldSpec::text("aircraft_comments"),
        FieldSpec::references("uas_registrations", EntityKind::Vehicle, "uvin"),
        FieldSpec::entities("operation_volumes", EntityKind::OperationVolume).required(),
        FieldSpec::reference("creator", EntityKind::User, "username").computed(),
        FieldSpec::date("submit_time").computed(),
        FieldSpec::date("update_time").computed(),
    ],
    rules: &[&Transitions {
        field: "state",
        initial: INITIAL_STATES,
        allowed: STATE_TRANSITIONS,
    }],
    accepts_extra_fields: true,
    has_documents: true,
    display_name: operation_name,
};

pub static OPERATION_VOLUME: KindDefinition = KindDefinition {
    kind: EntityKind::OperationVolume,
    id_key: None,
    owner_key: None,
    fields: &[
        FieldSpec::number("ordinal").at_least(0.0),
        FieldSpec::boolean("near_structure"),
        FieldSpec::date("effective_time_begin").required(),
        FieldSpec::date("effective_time_end").required(),
        FieldSpec::number("min_altitude").required(),
        FieldSpec::number("max_altitude").required(),
        FieldSpec::polygon("operation_geography").required(),
        FieldSpec::boolean("beyond_visual_line_of_sight"),
    ],
    rules: &[
        &PolygonShape {
            field: "operation_geography",
        },
        &DateOrder {
            begin: "effective_time_begin",
            end: "effective_time_end",
        },
        &NumberOrder {
            min: "min_altitude",
            max: "max_altitude",
        },
    ],
    accepts_extra_fields: false,
    has_documents: false,
    display_name: volume_name,
};

fn operation_name(operation: &Entity) -> String {
    super::text_or_id(operation, "name")
}

fn volume_name(volume: &Entity) -> String {
    match volume.get_f64("ordinal") {
        Some(ordinal) => format!("Volume {ordinal}"),
        None => "Volume".to_string(),
    }
}
