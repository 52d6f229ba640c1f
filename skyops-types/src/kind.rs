use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The closed set of domain entity kinds handled by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Vehicle,
    Operation,
    /// A 4D volume belonging to an operation or flight request.
    OperationVolume,
    Document,
    RestrictedFlightVolume,
    /// A UAS volume reservation (UVR) blocking airspace for a time window.
    AirspaceReservation,
    Tracker,
    Coordinator,
    FlightRequest,
    RegularFlight,
    /// One leg of a regular flight's path.
    Segment,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 12] = [
        EntityKind::User,
        EntityKind::Vehicle,
        EntityKind::Operation,
        EntityKind::OperationVolume,
        EntityKind::Document,
        EntityKind::RestrictedFlightVolume,
        EntityKind::AirspaceReservation,
        EntityKind::Tracker,
        EntityKind::Coordinator,
        EntityKind::FlightRequest,
        EntityKind::RegularFlight,
        EntityKind::Segment,
    ];

    /// Canonical snake_case name, as used in schema documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Operation => "operation",
            EntityKind::OperationVolume => "operation_volume",
            EntityKind::Document => "document",
            EntityKind::RestrictedFlightVolume => "restricted_flight_volume",
            EntityKind::AirspaceReservation => "airspace_reservation",
            EntityKind::Tracker => "tracker",
            EntityKind::Coordinator => "coordinator",
            EntityKind::FlightRequest => "flight_request",
            EntityKind::RegularFlight => "regular_flight",
            EntityKind::Segment => "segment",
        }
    }

    /// Returns true for kinds that only exist nested inside another entity
    /// and have no endpoint of their own.
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        matches!(self, EntityKind::OperationVolume | EntityKind::Segment)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    /// Accepts the canonical name, camelCase and plural spellings, and the
    /// `uvr` / `rfv` abbreviations used by schema documents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match normalized.as_str() {
            "user" | "users" => EntityKind::User,
            "vehicle" | "vehicles" => EntityKind::Vehicle,
            "operation" | "operations" => EntityKind::Operation,
            "operationvolume" | "operationvolumes" | "volume" | "volumes" => {
                EntityKind::OperationVolume
            }
            "document" | "documents" => EntityKind::Document,
            "restrictedflightvolume" | "restrictedflightvolumes" | "rfv" => {
                EntityKind::RestrictedFlightVolume
            }
            "airspacereservation" | "airspacereservations" | "uvr" | "uvrs" => {
                EntityKind::AirspaceReservation
            }
            "tracker" | "trackers" => EntityKind::Tracker,
            "coordinator" | "coordinators" => EntityKind::Coordinator,
            "flightrequest" | "flightrequests" => EntityKind::FlightRequest,
            "regularflight" | "regularflights" => EntityKind::RegularFlight,
            "segment" | "segments" => EntityKind::Segment,
            _ => return Err(Error::UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}
