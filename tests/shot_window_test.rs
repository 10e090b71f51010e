use chrono::{Duration, TimeZone, Utc};
use huntwatch_rs::models::Shot;
use huntwatch_rs::reconciler::ShotWindow;

fn shot(id: i64) -> Shot {
    let base = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
    Shot {
        id: Some(id),
        hunter: Some(1),
        hunter_name: Some("Jane Doe".to_string()),
        gun: Some(1),
        timestamp: base + Duration::seconds(id),
        location: "North Ridge".to_string(),
        latitude: None,
        longitude: None,
        sound_level: Some(95.0),
        vibration_level: Some(60.0),
        weapon_used: Some("Rifle".to_string()),
        notes: String::new(),
    }
}

fn shots(ids: &[i64]) -> Vec<Shot> {
    ids.iter().map(|id| shot(*id)).collect()
}

fn window_ids(window: &ShotWindow) -> Vec<i64> {
    window.shots().iter().filter_map(|s| s.id).collect()
}

#[test]
fn merge_prepends_new_shots_in_fetch_order() {
    let mut window = ShotWindow::new(50);
    window.reset(shots(&[3, 2, 1]));

    let new_ids = window.merge(shots(&[5, 4, 3, 2]));

    assert_eq!(new_ids, vec![5, 4]);
    assert_eq!(window_ids(&window), vec![5, 4, 3, 2, 1]);
}

#[test]
fn merge_is_idempotent_for_overlapping_fetches() {
    let mut window = ShotWindow::new(50);
    window.reset(shots(&[3, 2, 1]));

    let first = window.merge(shots(&[4, 3, 2]));
    assert_eq!(first, vec![4]);

    // The same page arrives again on the next poll.
    let second = window.merge(shots(&[4, 3, 2]));
    assert!(second.is_empty());
    assert_eq!(window_ids(&window), vec![4, 3, 2, 1]);
}

#[test]
fn window_never_exceeds_its_cap() {
    let mut window = ShotWindow::new(50);
    let initial: Vec<i64> = (1..=50).rev().collect();
    window.reset(shots(&initial));
    assert_eq!(window.len(), 50);

    let new_ids = window.merge(shots(&[53, 52, 51]));
    assert_eq!(new_ids, vec![53, 52, 51]);
    assert_eq!(window.len(), 50);

    // Newest survive, oldest fall off the back.
    assert_eq!(window_ids(&window)[..3], [53, 52, 51]);
    assert!(!window_ids(&window).contains(&1));
    assert!(!window_ids(&window).contains(&3));
}

#[test]
fn reset_truncates_and_clears_highlights() {
    let mut window = ShotWindow::new(3);
    window.reset(shots(&[9, 8, 7]));
    window.merge(shots(&[10]));
    assert!(window.is_fresh(10));

    window.reset(shots(&[20, 19, 18, 17, 16]));
    assert_eq!(window.len(), 3);
    assert_eq!(window_ids(&window), vec![20, 19, 18]);
    assert!(!window.is_fresh(10));
    assert!(!window.is_fresh(20));
}

#[test]
fn merged_shots_are_marked_fresh_until_cleared() {
    let mut window = ShotWindow::new(50);
    window.reset(shots(&[2, 1]));

    let new_ids = window.merge(shots(&[4, 3, 2]));
    assert!(window.is_fresh(4));
    assert!(window.is_fresh(3));
    assert!(!window.is_fresh(2));

    assert!(window.clear_fresh(&new_ids));
    assert!(!window.is_fresh(4));
    assert!(!window.is_fresh(3));

    // Clearing again reports no change.
    assert!(!window.clear_fresh(&new_ids));
}

#[test]
fn fresh_marks_survive_unrelated_expiry() {
    let mut window = ShotWindow::new(50);
    window.reset(shots(&[1]));

    let first = window.merge(shots(&[2]));
    let second = window.merge(shots(&[3]));

    // The first batch's timer fires; the second batch stays highlighted.
    window.clear_fresh(&first);
    assert!(!window.is_fresh(2));
    assert!(window.is_fresh(3));
    assert_eq!(second, vec![3]);
}

#[test]
fn repeated_ids_within_one_fetch_merge_once() {
    let mut window = ShotWindow::new(50);
    window.reset(shots(&[1]));

    // A page can carry the same record twice; the id is the sole
    // de-duplication key even within a single fetch.
    let new_ids = window.merge(shots(&[2, 2, 1]));

    assert_eq!(new_ids, vec![2]);
    assert_eq!(window_ids(&window), vec![2, 1]);
}

#[test]
fn shots_without_ids_are_ignored_by_merge() {
    let mut window = ShotWindow::new(50);
    window.reset(shots(&[1]));

    let mut anonymous = shot(99);
    anonymous.id = None;
    let new_ids = window.merge(vec![anonymous, shot(2)]);

    assert_eq!(new_ids, vec![2]);
    assert_eq!(window_ids(&window), vec![2, 1]);
}
