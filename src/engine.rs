use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::Shot;

// ===== FILTERING =====

/// Conjunction of per-column predicates over the shot table. An unset field
/// matches everything, so the default filter passes every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotFilter {
    pub hunter: Option<String>,
    pub weapon: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ShotFilter {
    pub fn is_empty(&self) -> bool {
        self.hunter.is_none()
            && self.weapon.is_none()
            && self.location.is_none()
            && self.date.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, shot: &Shot) -> bool {
        if let Some(hunter) = &self.hunter {
            let name = shot.hunter_name.as_deref().unwrap_or("");
            if !name.eq_ignore_ascii_case(hunter) {
                return false;
            }
        }
        if let Some(weapon) = &self.weapon {
            let used = shot.weapon_used.as_deref().unwrap_or("");
            if !used.eq_ignore_ascii_case(weapon) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            if !shot.location.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(date) = &self.date {
            if shot.timestamp.date_naive() != *date {
                return false;
            }
        }
        true
    }
}

// ===== SORTING =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Hunter,
    Timestamp,
    Location,
    Weapon,
    Sound,
    Vibration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Current sort column and direction. Toggling the active column flips the
/// direction; picking a different column starts it ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Timestamp,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

fn compare(a: &Shot, b: &Shot, field: SortField) -> Ordering {
    match field {
        SortField::Hunter => text_key(a.hunter_name.as_deref()).cmp(&text_key(b.hunter_name.as_deref())),
        SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortField::Location => a.location.to_lowercase().cmp(&b.location.to_lowercase()),
        SortField::Weapon => text_key(a.weapon_used.as_deref()).cmp(&text_key(b.weapon_used.as_deref())),
        SortField::Sound => numeric_key(a.sound_level).total_cmp(&numeric_key(b.sound_level)),
        SortField::Vibration => {
            numeric_key(a.vibration_level).total_cmp(&numeric_key(b.vibration_level))
        }
    }
}

fn text_key(value: Option<&str>) -> String {
    value.unwrap_or("").to_lowercase()
}

// Missing measurements sort as zero instead of poisoning the order.
fn numeric_key(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Filters and sorts a snapshot of the shot window for display. The sort is
/// stable, so records that compare equal keep their arrival order.
pub fn filter_and_sort(shots: &[Shot], filter: &ShotFilter, sort: SortState) -> Vec<Shot> {
    let mut rows: Vec<Shot> = shots.iter().filter(|s| filter.matches(s)).cloned().collect();
    rows.sort_by(|a, b| {
        let ord = compare(a, b, sort.field);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    rows
}
