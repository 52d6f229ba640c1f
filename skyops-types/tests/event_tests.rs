use serde_json::json;
use skyops_types::{ChangeEvent, ChangeKind, EntityId, EntityKind, EventId};
use std::str::FromStr;

// ── EventId ───────────────────────────────────────────────────────

#[test]
fn event_id_unique() {
    assert_ne!(EventId::new(), EventId::new());
}

#[test]
fn event_id_display_roundtrip() {
    let id = EventId::new();
    let parsed: EventId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn event_id_from_str_invalid() {
    assert!(EventId::from_str("bad").is_err());
}

// ── ChangeEvent ──────────────────────────────────────────────────

#[test]
fn change_event_effective_when_values_differ() {
    let event = ChangeEvent::new(
        EntityKind::Vehicle,
        EntityId::New,
        ChangeKind::Field,
        "vehicleName",
        json!(""),
        json!("Falcon"),
    );
    assert!(event.is_effective());
    assert_eq!(event.field, "vehicleName");
}

#[test]
fn change_event_not_effective_when_equal() {
    let event = ChangeEvent::new(
        EntityKind::Vehicle,
        EntityId::persisted("v1"),
        ChangeKind::ExtraField,
        "serial_number",
        json!("SN-001"),
        json!("SN-001"),
    );
    assert!(!event.is_effective());
}

#[test]
fn change_event_serde_roundtrip() {
    let event = ChangeEvent::new(
        EntityKind::Operation,
        EntityId::persisted("gufi-1"),
        ChangeKind::ExtraFieldRemoved,
        "insurance",
        json!("ACME-77"),
        json!(null),
    );
    let json = serde_json::to_string(&event).unwrap();
    let parsed: ChangeEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
    assert!(json.contains("\"extra_field_removed\""));
    assert!(json.contains("\"operation\""));
}
