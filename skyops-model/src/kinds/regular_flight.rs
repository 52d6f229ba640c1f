//! Recurring flights along a fixed path of segments.

use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::{FieldSpec, KindDefinition};

pub static REGULAR_FLIGHT: KindDefinition = KindDefinition {
    kind: EntityKind::RegularFlight,
    id_key: Some("id"),
    owner_key: None,
    fields: &[
        FieldSpec::text("name").required(),
        FieldSpec::text("description"),
        FieldSpec::text("start_vertiport"),
        FieldSpec::text("end_vertiport"),
        FieldSpec::entities("path", EntityKind::Segment).required(),
        FieldSpec::boolean("verified").computed(),
    ],
    rules: &[],
    accepts_extra_fields: true,
    has_documents: false,
    display_name: flight_name,
};

pub static SEGMENT: KindDefinition = KindDefinition {
    kind: EntityKind::Segment,
    id_key: None,
    owner_key: None,
    fields: &[
        FieldSpec::number("ordinal").at_least(0.0),
        FieldSpec::point("start").required(),
        FieldSpec::point("end").required(),
        FieldSpec::number("altitude"),
        FieldSpec::number("horizontal_buffer").at_least(0.0),
        FieldSpec::number("vertical_buffer").at_least(0.0),
        FieldSpec::number("ground_speed").at_least(0.0),
        FieldSpec::number("time_buffer").at_least(0.0),
    ],
    rules: &[],
    accepts_extra_fields: false,
    has_documents: false,
    display_name: segment_name,
};

fn flight_name(flight: &Entity) -> String {
    super::text_or_id(flight, "name")
}

fn segment_name(segment: &Entity) -> String {
    match segment.get_f64("ordinal") {
        Some(ordinal) => format!("Segment {ordinal}"),
        None => "Segment".to_string(),
    }
}
