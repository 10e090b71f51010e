use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{Ammunition, AmmunitionPurchase, HuntingZone, License, Shot};

// ===== AMMUNITION =====

pub const LOW_STOCK_THRESHOLD: u32 = 50;
pub const CRITICAL_STOCK_THRESHOLD: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Normal,
    Low,
    Critical,
}

impl StockLevel {
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity < CRITICAL_STOCK_THRESHOLD {
            StockLevel::Critical
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockLevel::Low
        } else {
            StockLevel::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmmoTotals {
    pub total_rounds: u64,
    pub total_value: f64,
}

/// Fleet-wide round count and inventory value. Items without a unit cost
/// contribute rounds but no value.
pub fn ammo_totals(inventory: &[Ammunition]) -> AmmoTotals {
    let mut totals = AmmoTotals::default();
    for item in inventory {
        totals.total_rounds += u64::from(item.quantity);
        if let Some(cost) = item.cost_per_unit {
            totals.total_value += f64::from(item.quantity) * cost;
        }
    }
    totals
}

pub fn stock_level(item: &Ammunition) -> StockLevel {
    StockLevel::for_quantity(item.quantity)
}

/// Purchases where more rounds were consumed than the purchase covered.
/// Returns each offending purchase with its excess count.
pub fn overused_purchases(purchases: &[AmmunitionPurchase]) -> Vec<(&AmmunitionPurchase, u32)> {
    purchases
        .iter()
        .filter(|p| p.used_quantity > p.quantity)
        .map(|p| (p, p.used_quantity - p.quantity))
        .collect()
}

// ===== LICENSES =====

pub const EXPIRY_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseBand {
    Expired,
    ExpiringSoon,
    Valid,
}

/// Classifies a license for the compliance panel. The backend's `is_valid`
/// flag is authoritative; an invalid license is shown as expired even when
/// the expiry date has not passed, since revocations look the same here.
pub fn license_band(license: &License) -> LicenseBand {
    if !license.is_valid {
        LicenseBand::Expired
    } else if license.days_until_expiry <= EXPIRY_WARNING_DAYS {
        LicenseBand::ExpiringSoon
    } else {
        LicenseBand::Valid
    }
}

// ===== ZONES =====

/// A zone is considered in season when it is active and today falls inside
/// its season window, inclusive on both ends.
pub fn zone_in_season(zone: &HuntingZone, today: NaiveDate) -> bool {
    zone.is_active && zone.season_start <= today && today <= zone.season_end
}

// ===== ACTIVITY =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotActivity {
    pub last_24h: usize,
    pub last_7d: usize,
}

/// Buckets shots by recency relative to `now`. The 24-hour bucket is a
/// subset of the 7-day one.
pub fn shot_activity(shots: &[Shot], now: DateTime<Utc>) -> ShotActivity {
    let day_ago = now - Duration::hours(24);
    let week_ago = now - Duration::days(7);
    let mut activity = ShotActivity::default();
    for shot in shots {
        if shot.timestamp > week_ago {
            activity.last_7d += 1;
            if shot.timestamp > day_ago {
                activity.last_24h += 1;
            }
        }
    }
    activity
}

/// Shots per location, most active first. Ties keep first-seen order.
pub fn zone_activity(shots: &[Shot]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for shot in shots {
        if shot.location.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(loc, _)| *loc == shot.location) {
            Some((_, n)) => *n += 1,
            None => counts.push((shot.location.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
