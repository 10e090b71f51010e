use huntwatch_rs::models::*;

// ===== ENVELOPE =====

#[test]
fn bare_array_normalizes_to_records() {
    let body = r#"[
        {"id": 1, "name": "Jane Doe", "license_number": "HL-2041", "current_location": "North Ridge", "is_active": true},
        {"id": 2, "name": "John Roe", "license_number": "HL-2042", "current_location": "South Marsh", "is_active": false}
    ]"#;
    let envelope: Envelope<Hunter> = serde_json::from_str(body).unwrap();
    let hunters = envelope.into_records();
    assert_eq!(hunters.len(), 2);
    assert_eq!(hunters[0].name, "Jane Doe");
}

#[test]
fn paginated_object_normalizes_to_records() {
    let body = r#"{
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {"id": 1, "name": "Jane Doe", "license_number": "HL-2041", "current_location": "North Ridge", "is_active": true}
        ]
    }"#;
    let envelope: Envelope<Hunter> = serde_json::from_str(body).unwrap();
    let hunters = envelope.into_records();
    assert_eq!(hunters.len(), 1);
    assert_eq!(hunters[0].id, Some(1));
}

#[test]
fn empty_results_in_either_shape_are_fine() {
    let bare: Envelope<Hunter> = serde_json::from_str("[]").unwrap();
    assert!(bare.into_records().is_empty());

    let paginated: Envelope<Hunter> = serde_json::from_str(r#"{"results": []}"#).unwrap();
    assert!(paginated.into_records().is_empty());
}

// ===== DECIMAL STRINGS =====

#[test]
fn shot_measurements_accept_decimal_strings() {
    let body = r#"{
        "id": 10,
        "hunter": 1,
        "hunter_name": "Jane Doe",
        "gun": 2,
        "timestamp": "2026-08-29T10:15:00Z",
        "location": "North Ridge",
        "sound_level": "95.50",
        "vibration_level": 61.2,
        "weapon_used": "Rifle",
        "notes": ""
    }"#;
    let shot: Shot = serde_json::from_str(body).unwrap();
    assert_eq!(shot.sound_level, Some(95.5));
    assert_eq!(shot.vibration_level, Some(61.2));
}

#[test]
fn blank_decimal_strings_deserialize_as_missing() {
    let body = r#"{
        "id": 11,
        "timestamp": "2026-08-29T10:15:00Z",
        "location": "North Ridge",
        "sound_level": "",
        "vibration_level": null
    }"#;
    let shot: Shot = serde_json::from_str(body).unwrap();
    assert_eq!(shot.sound_level, None);
    assert_eq!(shot.vibration_level, None);
}

#[test]
fn malformed_decimal_strings_degrade_to_missing() {
    // A corrupt sensor reading must not reject the record, let alone the
    // whole collection fetch it arrived in.
    let body = r#"{
        "id": 12,
        "timestamp": "2026-08-29T10:15:00Z",
        "location": "North Ridge",
        "sound_level": "garbage",
        "vibration_level": "61.2dB"
    }"#;
    let shot: Shot = serde_json::from_str(body).unwrap();
    assert_eq!(shot.id, Some(12));
    assert_eq!(shot.sound_level, None);
    assert_eq!(shot.vibration_level, None);
}

#[test]
fn zone_geometry_accepts_decimal_strings() {
    let body = r#"{
        "id": 1,
        "name": "North Ridge",
        "center_latitude": "40.712800",
        "center_longitude": "-74.006000",
        "radius_km": 5.0,
        "season_start": "2026-08-01",
        "season_end": "2026-09-30",
        "is_active": true
    }"#;
    let zone: HuntingZone = serde_json::from_str(body).unwrap();
    assert_eq!(zone.center_latitude, Some(40.7128));
    assert_eq!(zone.radius_km, Some(5.0));
}

// ===== ENUMS =====

#[test]
fn gun_status_parses_known_values_and_defaults_otherwise() {
    assert_eq!(GunStatus::from("active"), GunStatus::Active);
    assert_eq!(GunStatus::from("maintenance"), GunStatus::Maintenance);
    assert_eq!(GunStatus::from("decommissioned"), GunStatus::Inactive);
}

#[test]
fn severity_uses_uppercase_wire_format() {
    let severity: Severity = serde_json::from_str(r#""CRITICAL""#).unwrap();
    assert_eq!(severity, Severity::Critical);
    assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), r#""LOW""#);
}

// ===== SUBMISSION PAYLOADS =====

#[test]
fn new_hunter_payload_omits_the_id() {
    let hunter = Hunter::new(
        "Jane Doe".to_string(),
        "HL-2041".to_string(),
        "North Ridge".to_string(),
    );
    let json = serde_json::to_value(&hunter).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["name"], "Jane Doe");
}

#[test]
fn gun_low_battery_threshold() {
    let mut gun: Gun = serde_json::from_str(
        r#"{"device_id": "GUN-1", "make": "Acme", "model": "M1", "weapon_type": "rifle", "status": "active", "battery_level": 19.5}"#,
    )
    .unwrap();
    assert!(gun.is_low_battery());
    gun.battery_level = 20.0;
    assert!(!gun.is_low_battery());
}

#[test]
fn dashboard_stats_default_to_zero() {
    let stats = DashboardStats::default();
    assert_eq!(stats.active_hunters, 0);
    assert_eq!(stats.total_shots, 0);

    let parsed: DashboardStats = serde_json::from_str(
        r#"{"active_hunters": 3, "total_shots": 120, "total_bullets": 4500, "active_locations": 2}"#,
    )
    .unwrap();
    assert_eq!(parsed.total_bullets, 4500);
}
