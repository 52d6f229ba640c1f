//! Airspace restrictions: permanent restricted volumes and time-boxed
//! reservations (UVRs).

use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};
use crate::rules::{DateOrder, NumberOrder, PolygonShape};

pub const RESERVATION_TYPES: &[&str] = &["DYNAMIC_RESTRICTION", "STATIC_ADVISORY"];
pub const RESERVATION_CAUSES: &[&str] =
    &["WEATHER", "ATC", "SECURITY", "SAFETY", "MUNICIPALITY", "OTHER"];

pub static RESTRICTED_FLIGHT_VOLUME: KindDefinition = KindDefinition {
    kind: EntityKind::RestrictedFlightVolume,
    id_key: Some("id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("comments").required().max_length(1000),
        FieldSpec::number("min_altitude").required(),
        FieldSpec::number("max_altitude").required(),
        FieldSpec::polygon("geography").required(),
    ],
    rules: &[
        &PolygonShape { field: "geography" },
        &NumberOrder {
            min: "min_altitude",
            max: "max_altitude",
        },
    ],
    accepts_extra_fields: true,
    has_documents: false,
    display_name: restricted_volume_name,
};

pub static AIRSPACE_RESERVATION: KindDefinition = KindDefinition {
    kind: EntityKind::AirspaceReservation,
    id_key: Some("message_id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("uss_name").computed(),
        FieldSpec::choice("type", RESERVATION_TYPES).required(),
        FieldSpec::choice("cause", RESERVATION_CAUSES).required(),
        FieldSpec::text("reason").required().max_length(1000),
        FieldSpec::json("permitted_uas"),
        FieldSpec::json("required_support"),
        FieldSpec::polygon("geography").required(),
        FieldSpec::date("effective_time_begin").required(),
        FieldSpec::date("effective_time_end").required(),
        FieldSpec::date("actual_time_end").computed(),
        FieldSpec::number("min_altitude").required(),
        FieldSpec::number("max_altitude").required(),
    ],
    rules: &[
        &PolygonShape { field: "geography" },
        &DateOrder {
            begin: "effective_time_begin",
            end: "effective_time_end",
        },
        &NumberOrder {
            min: "min_altitude",
            max: "max_altitude",
        },
    ],
    accepts_extra_fields: true,
    has_documents: false,
    display_name: reservation_name,
};

fn restricted_volume_name(volume: &Entity) -> String {
    super::text_or_id(volume, "comments")
}

fn reservation_name(reservation: &Entity) -> String {
    super::text_or_id(reservation, "reason")
}
