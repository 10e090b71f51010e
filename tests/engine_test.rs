use chrono::{TimeZone, Utc};
use huntwatch_rs::engine::*;
use huntwatch_rs::models::Shot;

fn shot(id: i64, hunter: &str, weapon: &str, location: &str, day: u32, sound: Option<f64>) -> Shot {
    Shot {
        id: Some(id),
        hunter: Some(1),
        hunter_name: Some(hunter.to_string()),
        gun: Some(1),
        // Seconds follow the id so every shot has a distinct instant.
        timestamp: Utc.with_ymd_and_hms(2026, 8, day, 9, 0, id as u32).unwrap(),
        location: location.to_string(),
        latitude: None,
        longitude: None,
        sound_level: sound,
        vibration_level: None,
        weapon_used: Some(weapon.to_string()),
        notes: String::new(),
    }
}

fn sample() -> Vec<Shot> {
    vec![
        shot(1, "Alice", "Rifle", "North Ridge", 20, Some(100.0)),
        shot(2, "bob", "Shotgun", "South Marsh", 20, Some(90.0)),
        shot(3, "Alice", "Shotgun", "North Ridge", 21, None),
        shot(4, "Carol", "Rifle", "East Valley", 21, Some(110.0)),
    ]
}

fn ids(rows: &[Shot]) -> Vec<i64> {
    rows.iter().filter_map(|s| s.id).collect()
}

#[test]
fn empty_filter_matches_everything() {
    let filter = ShotFilter::default();
    assert!(filter.is_empty());
    let rows = filter_and_sort(&sample(), &filter, SortState::default());
    assert_eq!(rows.len(), 4);
}

#[test]
fn filters_compose_as_a_conjunction() {
    let filter = ShotFilter {
        hunter: Some("alice".to_string()),
        weapon: Some("shotgun".to_string()),
        ..Default::default()
    };
    let rows = filter_and_sort(&sample(), &filter, SortState::default());
    assert_eq!(ids(&rows), vec![3]);

    // Each predicate alone matches more than the conjunction.
    let hunter_only = ShotFilter {
        hunter: Some("alice".to_string()),
        ..Default::default()
    };
    assert_eq!(filter_and_sort(&sample(), &hunter_only, SortState::default()).len(), 2);
}

#[test]
fn string_matching_ignores_case() {
    let filter = ShotFilter {
        hunter: Some("BOB".to_string()),
        ..Default::default()
    };
    let rows = filter_and_sort(&sample(), &filter, SortState::default());
    assert_eq!(ids(&rows), vec![2]);

    let location = ShotFilter {
        location: Some("north".to_string()),
        ..Default::default()
    };
    let rows = filter_and_sort(&sample(), &location, SortState::default());
    assert_eq!(rows.len(), 2);
}

#[test]
fn date_filter_matches_the_calendar_day() {
    let filter = ShotFilter {
        date: Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 21).unwrap()),
        ..Default::default()
    };
    let rows = filter_and_sort(&sample(), &filter, SortState::default());
    assert_eq!(ids(&rows), vec![4, 3]);
}

#[test]
fn toggling_the_active_column_flips_direction() {
    let mut sort = SortState::default();
    assert_eq!(sort.field, SortField::Timestamp);
    assert_eq!(sort.direction, SortDirection::Descending);

    sort.toggle(SortField::Timestamp);
    assert_eq!(sort.direction, SortDirection::Ascending);

    sort.toggle(SortField::Hunter);
    assert_eq!(sort.field, SortField::Hunter);
    assert_eq!(sort.direction, SortDirection::Ascending);

    sort.toggle(SortField::Hunter);
    assert_eq!(sort.direction, SortDirection::Descending);
}

#[test]
fn hunter_sort_is_case_insensitive() {
    let sort = SortState {
        field: SortField::Hunter,
        direction: SortDirection::Ascending,
    };
    let rows = filter_and_sort(&sample(), &ShotFilter::default(), sort);
    // "bob" sorts between Alice and Carol despite its lowercase b.
    assert_eq!(ids(&rows), vec![1, 3, 2, 4]);
}

#[test]
fn missing_sound_levels_sort_as_zero() {
    let sort = SortState {
        field: SortField::Sound,
        direction: SortDirection::Ascending,
    };
    let rows = filter_and_sort(&sample(), &ShotFilter::default(), sort);
    assert_eq!(ids(&rows), vec![3, 2, 1, 4]);
}

#[test]
fn equal_keys_keep_arrival_order() {
    let sort = SortState {
        field: SortField::Location,
        direction: SortDirection::Ascending,
    };
    let rows = filter_and_sort(&sample(), &ShotFilter::default(), sort);
    // Shots 1 and 3 share a location and stay in their original order.
    assert_eq!(ids(&rows), vec![4, 1, 3, 2]);
}

#[test]
fn clear_resets_every_predicate() {
    let mut filter = ShotFilter {
        hunter: Some("alice".to_string()),
        weapon: Some("rifle".to_string()),
        location: Some("ridge".to_string()),
        date: Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()),
    };
    filter.clear();
    assert!(filter.is_empty());
}
