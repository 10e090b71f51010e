use chrono::{Duration, NaiveDate, TimeZone, Utc};
use huntwatch_rs::metrics::*;
use huntwatch_rs::models::{Ammunition, AmmunitionPurchase, HuntingZone, License, Shot};

fn ammo(quantity: u32, cost: Option<f64>) -> Ammunition {
    Ammunition {
        id: Some(1),
        ammo_type: "12 gauge".to_string(),
        ammo_type_display: None,
        quantity,
        location: "Armory".to_string(),
        cost_per_unit: cost,
        supplier: "Acme".to_string(),
        purchase_date: None,
        minimum_stock: None,
        is_low_stock: None,
    }
}

fn purchase(quantity: u32, used: u32) -> AmmunitionPurchase {
    AmmunitionPurchase {
        id: Some(1),
        hunter: 1,
        hunter_name: Some("Jane Doe".to_string()),
        ammo_type: "12 gauge".to_string(),
        quantity,
        used_quantity: used,
        remaining_quantity: None,
        purchase_price: None,
        vendor: "Acme".to_string(),
        receipt_number: "R-100".to_string(),
        purchase_date: None,
    }
}

fn license(is_valid: bool, days_until_expiry: i64) -> License {
    License {
        id: Some(1),
        hunter: 1,
        hunter_name: Some("Jane Doe".to_string()),
        license_number: "HL-2041".to_string(),
        license_type: "standard".to_string(),
        issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        is_valid,
        days_until_expiry,
        max_daily_shots: None,
    }
}

fn zone(is_active: bool, start: (i32, u32, u32), end: (i32, u32, u32)) -> HuntingZone {
    HuntingZone {
        id: Some(1),
        name: "North Ridge".to_string(),
        description: String::new(),
        center_latitude: None,
        center_longitude: None,
        radius_km: None,
        season_start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        season_end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        daily_start_time: "06:00".to_string(),
        daily_end_time: "18:00".to_string(),
        allowed_weekdays: "0,1,2,3,4,5,6".to_string(),
        is_active,
    }
}

fn shot_at(hours_ago: i64, location: &str) -> Shot {
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    Shot {
        id: Some(hours_ago),
        hunter: Some(1),
        hunter_name: None,
        gun: Some(1),
        timestamp: now - Duration::hours(hours_ago),
        location: location.to_string(),
        latitude: None,
        longitude: None,
        sound_level: None,
        vibration_level: None,
        weapon_used: None,
        notes: String::new(),
    }
}

// ===== AMMUNITION =====

#[test]
fn totals_sum_rounds_and_value() {
    let inventory = vec![ammo(100, Some(0.5)), ammo(40, Some(2.0)), ammo(10, None)];
    let totals = ammo_totals(&inventory);
    assert_eq!(totals.total_rounds, 150);
    // 100 * 0.5 + 40 * 2.0; the costless item adds nothing.
    assert!((totals.total_value - 130.0).abs() < f64::EPSILON);
}

#[test]
fn stock_bands_use_exclusive_thresholds() {
    assert_eq!(StockLevel::for_quantity(0), StockLevel::Critical);
    assert_eq!(StockLevel::for_quantity(19), StockLevel::Critical);
    assert_eq!(StockLevel::for_quantity(20), StockLevel::Low);
    assert_eq!(StockLevel::for_quantity(49), StockLevel::Low);
    assert_eq!(StockLevel::for_quantity(50), StockLevel::Normal);
    assert_eq!(stock_level(&ammo(15, None)), StockLevel::Critical);
}

#[test]
fn overuse_reports_only_purchases_in_excess() {
    let purchases = vec![purchase(100, 100), purchase(50, 72), purchase(30, 10)];
    let flagged = overused_purchases(&purchases);
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].1, 22);
    assert_eq!(flagged[0].0.quantity, 50);
}

// ===== LICENSES =====

#[test]
fn invalid_license_is_expired_regardless_of_date() {
    // Revoked with plenty of days left on the calendar.
    assert_eq!(license_band(&license(false, 200)), LicenseBand::Expired);
    assert_eq!(license_band(&license(false, -5)), LicenseBand::Expired);
}

#[test]
fn license_expiry_warning_window_is_thirty_days() {
    assert_eq!(license_band(&license(true, 30)), LicenseBand::ExpiringSoon);
    assert_eq!(license_band(&license(true, 1)), LicenseBand::ExpiringSoon);
    assert_eq!(license_band(&license(true, 31)), LicenseBand::Valid);
    assert_eq!(license_band(&license(true, 365)), LicenseBand::Valid);
}

// ===== ZONES =====

#[test]
fn zone_season_is_inclusive_on_both_ends() {
    let z = zone(true, (2026, 8, 1), (2026, 9, 30));
    assert!(zone_in_season(&z, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()));
    assert!(zone_in_season(&z, NaiveDate::from_ymd_opt(2026, 9, 30).unwrap()));
    assert!(!zone_in_season(&z, NaiveDate::from_ymd_opt(2026, 7, 31).unwrap()));
    assert!(!zone_in_season(&z, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()));
}

#[test]
fn inactive_zone_is_never_in_season() {
    let z = zone(false, (2026, 8, 1), (2026, 9, 30));
    assert!(!zone_in_season(&z, NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()));
}

// ===== ACTIVITY =====

#[test]
fn activity_buckets_by_recency() {
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let shots = vec![
        shot_at(1, "North Ridge"),
        shot_at(23, "North Ridge"),
        shot_at(48, "South Marsh"),
        shot_at(24 * 6, "East Valley"),
        shot_at(24 * 8, "East Valley"),
    ];
    let activity = shot_activity(&shots, now);
    assert_eq!(activity.last_24h, 2);
    assert_eq!(activity.last_7d, 4);
}

#[test]
fn zone_activity_counts_shots_per_location() {
    let shots = vec![
        shot_at(1, "North Ridge"),
        shot_at(2, "South Marsh"),
        shot_at(3, "North Ridge"),
        shot_at(4, ""),
    ];
    let counts = zone_activity(&shots);
    assert_eq!(counts[0], ("North Ridge".to_string(), 2));
    assert_eq!(counts[1], ("South Marsh".to_string(), 1));
    assert_eq!(counts.len(), 2);
}
