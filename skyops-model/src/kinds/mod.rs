//! Field manifests of every entity kind.

pub mod airspace;
pub mod coordinator;
pub mod document;
pub mod flight_request;
pub mod operation;
pub mod regular_flight;
pub mod tracker;
pub mod user;
pub mod vehicle;

use skyops_types::EntityKind;

use crate::entity::Entity;
use crate::manifest::KindDefinition;

/// Returns the static definition of a kind.
#[must_use]
pub fn definition(kind: EntityKind) -> &'static KindDefinition {
    match kind {
        EntityKind::User => &user::USER,
        EntityKind::Vehicle => &vehicle::VEHICLE,
        EntityKind::Operation => &operation::OPERATION,
        EntityKind::OperationVolume => &operation::OPERATION_VOLUME,
        EntityKind::Document => &document::DOCUMENT,
        EntityKind::RestrictedFlightVolume => &airspace::RESTRICTED_FLIGHT_VOLUME,
        EntityKind::AirspaceReservation => &airspace::AIRSPACE_RESERVATION,
        EntityKind::Tracker => &tracker::TRACKER,
        EntityKind::Coordinator => &coordinator::COORDINATOR,
        EntityKind::FlightRequest => &flight_request::FLIGHT_REQUEST,
        EntityKind::RegularFlight => &regular_flight::REGULAR_FLIGHT,
        EntityKind::Segment => &regular_flight::SEGMENT,
    }
}

/// Display name from a single text field, falling back to the identifier.
pub(crate) fn text_or_id(entity: &Entity, field: &str) -> String {
    match entity.get_str(field).map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => entity.id().to_string(),
    }
}
