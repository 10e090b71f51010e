use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ===== ENUMS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GunStatus {
    Active,
    Inactive,
    Maintenance,
}

impl From<&str> for GunStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => GunStatus::Active,
            "maintenance" => GunStatus::Maintenance,
            _ => GunStatus::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Rifle,
    Shotgun,
    Handgun,
    Bow,
}

impl From<&str> for WeaponType {
    fn from(s: &str) -> Self {
        match s {
            "shotgun" => WeaponType::Shotgun,
            "handgun" => WeaponType::Handgun,
            "bow" => WeaponType::Bow,
            _ => WeaponType::Rifle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s {
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Low,
        }
    }
}

// ===== RESPONSE ENVELOPE =====

/// The backend answers list requests either with a bare JSON array or with a
/// paginated object exposing a `results` array. Resolved exactly once at the
/// client boundary; everything downstream sees `Vec<T>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Bare(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> Envelope<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            Envelope::Bare(records) => records,
            Envelope::Paginated { results } => results,
        }
    }
}

// ===== SERDE HELPERS =====

/// Deserializes an optional float that the API may send as a JSON number or a
/// decimal string (e.g. `"25.00"` for Decimal-backed fields).
pub fn deserialize_flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumericFormat {
        Number(f64),
        String(String),
    }

    let value = Option::<NumericFormat>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(NumericFormat::Number(n)) => Ok(Some(n)),
        // A malformed reading degrades to absent rather than rejecting the
        // whole record (and with it the whole collection fetch).
        Some(NumericFormat::String(s)) => Ok(s.trim().parse::<f64>().ok()),
    }
}

fn is_zero(n: &f64) -> bool {
    *n == 0.0
}

// ===== DATA STRUCTURES =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hunter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_type: Option<WeaponType>,
    #[serde(default)]
    pub current_location: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub total_guns: Option<u32>,
    #[serde(default, skip_serializing)]
    pub total_shots: Option<u32>,
}

impl Hunter {
    pub fn new(name: String, license_number: String, current_location: String) -> Self {
        Self {
            id: None,
            name,
            license_number,
            weapon_type: None,
            current_location,
            is_active: true,
            latitude: None,
            longitude: None,
            last_active: None,
            total_guns: None,
            total_shots: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gun {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub device_id: String,
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caliber: Option<String>,
    pub weapon_type: WeaponType,
    pub status: GunStatus,
    /// 0-100; below 20 the fleet view shows a low-battery warning.
    pub battery_level: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<i64>,
    #[serde(default, skip_serializing)]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl Gun {
    pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;

    pub fn is_low_battery(&self) -> bool {
        self.battery_level < Self::LOW_BATTERY_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hunter: Option<i64>,
    #[serde(default, skip_serializing)]
    pub hunter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gun: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub sound_level: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub vibration_level: Option<f64>,
    #[serde(default, skip_serializing)]
    pub weapon_used: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Payload for recording a new shot; the backend stamps the timestamp and
/// derives hunter attribution from the gun reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotCreate {
    pub gun: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub sound_level: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub vibration_level: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ammunition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub ammo_type: String,
    #[serde(default, skip_serializing)]
    pub ammo_type_display: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub cost_per_unit: Option<f64>,
    #[serde(default)]
    pub supplier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<u32>,
    #[serde(default, skip_serializing)]
    pub is_low_stock: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmunitionPurchase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub hunter: i64,
    #[serde(default, skip_serializing)]
    pub hunter_name: Option<String>,
    pub ammo_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub used_quantity: u32,
    /// Backend-derived (purchased minus used, clamped server-side); treated
    /// as authoritative and never recomputed here.
    #[serde(default, skip_serializing)]
    pub remaining_quantity: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub purchase_price: Option<f64>,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub receipt_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub hunter: i64,
    #[serde(default, skip_serializing)]
    pub hunter_name: Option<String>,
    pub violation_type: String,
    #[serde(default, skip_serializing)]
    pub violation_type_display: Option<String>,
    pub severity: Severity,
    pub description: String,
    pub detected_at: DateTime<Utc>,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub hunter: i64,
    #[serde(default, skip_serializing)]
    pub hunter_name: Option<String>,
    pub license_number: String,
    #[serde(default)]
    pub license_type: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    /// Backend-computed; authoritative regardless of `days_until_expiry`.
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub days_until_expiry: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_daily_shots: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntingZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub center_latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub center_longitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flexible_f64")]
    pub radius_km: Option<f64>,
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    #[serde(default)]
    pub daily_start_time: String,
    #[serde(default)]
    pub daily_end_time: String,
    /// Comma-separated weekday numbers, 0=Monday through 6=Sunday.
    #[serde(default)]
    pub allowed_weekdays: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub activity_type: String,
    #[serde(default)]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub metadata: Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub active_hunters: u64,
    #[serde(default)]
    pub total_shots: u64,
    #[serde(default)]
    pub total_bullets: u64,
    #[serde(default)]
    pub active_locations: u64,
}

/// Joint fetch of everything the backend knows about one hunter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HunterDetail {
    pub shots: Vec<Shot>,
    pub guns: Vec<Gun>,
    pub purchases: Vec<AmmunitionPurchase>,
    pub violations: Vec<Violation>,
    pub license: Option<License>,
}
