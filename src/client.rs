use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::{
    Activity, Ammunition, AmmunitionPurchase, DashboardStats, Envelope, Gun, Hunter, HunterDetail,
    HuntingZone, License, Shot, ShotCreate, Violation,
};

// ===== ERRORS =====

/// Failure classes the rest of the system dispatches on. A fetch failure and
/// an empty collection are different things: an empty array is a success.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP-level failure on any request.
    #[error("fetch failed: {0}")]
    FetchFailure(#[from] reqwest::Error),
    /// The backend rejected a submitted record; carries the raw error payload
    /// so it can be surfaced verbatim for correction.
    #[error("backend rejected submission ({status}): {detail}")]
    ValidationFailure { status: StatusCode, detail: String },
    /// Initialization gave up after the bounded retry sequence.
    #[error("connection attempts exhausted after {attempts} tries")]
    ExhaustedRetries { attempts: u32 },
}

pub type ApiResult<T> = Result<T, ApiError>;

// ===== CLIENT IMPLEMENTATION =====

/// Thin wrapper over the backend REST surface. One normalization point for
/// the list envelope, no retries; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct HuntwatchClient {
    http: reqwest::Client,
    base_url: String,
}

impl HuntwatchClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches a collection and normalizes the bare-array /
    /// `{results: [...]}` envelope ambiguity to a plain vector.
    async fn list<T>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let envelope: Envelope<T> = response.json().await?;
        let records = envelope.into_records();
        debug!(path, count = records.len(), "fetched collection");
        Ok(records)
    }

    async fn get_one<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// POST a record. Rejections come back as `ValidationFailure` with the
    /// backend's raw error payload.
    async fn create<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::parse_submission(response).await
    }

    async fn update<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Self::parse_submission(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.http
            .delete(self.url(path))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn parse_submission<T>(response: reqwest::Response) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(ApiError::ValidationFailure { status, detail })
        }
    }

    // ===== DASHBOARD =====

    pub async fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.get_one("/dashboard-stats/").await
    }

    /// Lightweight probe used by the background health check; any successful
    /// stats fetch counts as reachable.
    pub async fn ping(&self) -> bool {
        self.get_dashboard_stats().await.is_ok()
    }

    // ===== HUNTERS =====

    pub async fn get_hunters(&self) -> ApiResult<Vec<Hunter>> {
        self.list("/hunters/hunters/", &[]).await
    }

    pub async fn get_hunter(&self, id: i64) -> ApiResult<Hunter> {
        self.get_one(&format!("/hunters/hunters/{}/", id)).await
    }

    pub async fn create_hunter(&self, hunter: &Hunter) -> ApiResult<Hunter> {
        self.create("/hunters/hunters/", hunter).await
    }

    pub async fn update_hunter(&self, id: i64, hunter: &Hunter) -> ApiResult<Hunter> {
        self.update(&format!("/hunters/hunters/{}/", id), hunter)
            .await
    }

    pub async fn delete_hunter(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/hunters/hunters/{}/", id)).await
    }

    // ===== GUNS =====

    pub async fn get_guns(&self, owner: Option<i64>) -> ApiResult<Vec<Gun>> {
        let mut query = Vec::new();
        if let Some(owner) = owner {
            query.push(("owner", owner.to_string()));
        }
        self.list("/hunters/guns/", &query).await
    }

    pub async fn get_gun(&self, id: i64) -> ApiResult<Gun> {
        self.get_one(&format!("/hunters/guns/{}/", id)).await
    }

    pub async fn register_gun(&self, gun: &Gun) -> ApiResult<Gun> {
        self.create("/hunters/guns/", gun).await
    }

    pub async fn update_gun(&self, id: i64, gun: &Gun) -> ApiResult<Gun> {
        self.update(&format!("/hunters/guns/{}/", id), gun).await
    }

    pub async fn delete_gun(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/hunters/guns/{}/", id)).await
    }

    // ===== SHOTS =====

    pub async fn get_shots(&self, hunter: Option<i64>, limit: Option<u32>) -> ApiResult<Vec<Shot>> {
        let mut query = Vec::new();
        if let Some(hunter) = hunter {
            query.push(("hunter", hunter.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.list("/hunters/shots/", &query).await
    }

    /// The polling reconciler's page: the most recent `limit` shots.
    pub async fn get_recent_shots(&self, limit: u32) -> ApiResult<Vec<Shot>> {
        self.get_shots(None, Some(limit)).await
    }

    pub async fn record_shot(&self, shot: &ShotCreate) -> ApiResult<Shot> {
        self.create("/hunters/shots/", shot).await
    }

    pub async fn update_shot(&self, id: i64, shot: &Shot) -> ApiResult<Shot> {
        self.update(&format!("/hunters/shots/{}/", id), shot).await
    }

    pub async fn delete_shot(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/hunters/shots/{}/", id)).await
    }

    // ===== AMMUNITION =====

    pub async fn get_ammunition(&self) -> ApiResult<Vec<Ammunition>> {
        self.list("/ammunition/inventory/", &[]).await
    }

    pub async fn add_ammunition(&self, ammo: &Ammunition) -> ApiResult<Ammunition> {
        self.create("/ammunition/inventory/", ammo).await
    }

    pub async fn update_ammunition(&self, id: i64, ammo: &Ammunition) -> ApiResult<Ammunition> {
        self.update(&format!("/ammunition/inventory/{}/", id), ammo)
            .await
    }

    pub async fn delete_ammunition(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/ammunition/inventory/{}/", id)).await
    }

    // ===== ACTIVITIES =====

    pub async fn get_activities(&self) -> ApiResult<Vec<Activity>> {
        self.list("/activities/activities/", &[]).await
    }

    pub async fn log_activity(&self, activity: &Activity) -> ApiResult<Activity> {
        self.create("/activities/activities/", activity).await
    }

    pub async fn delete_activity(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/activities/activities/{}/", id)).await
    }

    // ===== COMPLIANCE =====

    pub async fn get_violations(&self, hunter: Option<i64>) -> ApiResult<Vec<Violation>> {
        let mut query = Vec::new();
        if let Some(hunter) = hunter {
            query.push(("hunter", hunter.to_string()));
        }
        self.list("/compliance/violations/", &query).await
    }

    pub async fn report_violation(&self, violation: &Violation) -> ApiResult<Violation> {
        self.create("/compliance/violations/", violation).await
    }

    pub async fn update_violation(&self, id: i64, violation: &Violation) -> ApiResult<Violation> {
        self.update(&format!("/compliance/violations/{}/", id), violation)
            .await
    }

    pub async fn get_hunting_zones(&self) -> ApiResult<Vec<HuntingZone>> {
        self.list("/compliance/hunting-zones/", &[]).await
    }

    pub async fn create_hunting_zone(&self, zone: &HuntingZone) -> ApiResult<HuntingZone> {
        self.create("/compliance/hunting-zones/", zone).await
    }

    pub async fn update_hunting_zone(&self, id: i64, zone: &HuntingZone) -> ApiResult<HuntingZone> {
        self.update(&format!("/compliance/hunting-zones/{}/", id), zone)
            .await
    }

    pub async fn delete_hunting_zone(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/compliance/hunting-zones/{}/", id))
            .await
    }

    pub async fn get_licenses(&self, hunter: Option<i64>) -> ApiResult<Vec<License>> {
        let mut query = Vec::new();
        if let Some(hunter) = hunter {
            query.push(("hunter", hunter.to_string()));
        }
        self.list("/compliance/licenses/", &query).await
    }

    pub async fn issue_license(&self, license: &License) -> ApiResult<License> {
        self.create("/compliance/licenses/", license).await
    }

    pub async fn update_license(&self, id: i64, license: &License) -> ApiResult<License> {
        self.update(&format!("/compliance/licenses/{}/", id), license)
            .await
    }

    pub async fn delete_license(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/compliance/licenses/{}/", id)).await
    }

    pub async fn get_ammunition_purchases(
        &self,
        hunter: Option<i64>,
    ) -> ApiResult<Vec<AmmunitionPurchase>> {
        let mut query = Vec::new();
        if let Some(hunter) = hunter {
            query.push(("hunter", hunter.to_string()));
        }
        self.list("/compliance/ammunition-purchases/", &query).await
    }

    pub async fn record_purchase(
        &self,
        purchase: &AmmunitionPurchase,
    ) -> ApiResult<AmmunitionPurchase> {
        self.create("/compliance/ammunition-purchases/", purchase)
            .await
    }

    pub async fn update_purchase(
        &self,
        id: i64,
        purchase: &AmmunitionPurchase,
    ) -> ApiResult<AmmunitionPurchase> {
        self.update(&format!("/compliance/ammunition-purchases/{}/", id), purchase)
            .await
    }

    pub async fn delete_purchase(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/compliance/ammunition-purchases/{}/", id))
            .await
    }

    // ===== JOINT FETCHES =====

    /// Everything the dashboard shows about one hunter, fetched jointly.
    pub async fn get_hunter_detail(&self, hunter_id: i64) -> ApiResult<HunterDetail> {
        let (shots, guns, purchases, violations, licenses) = tokio::try_join!(
            self.get_shots(Some(hunter_id), Some(10)),
            self.get_guns(Some(hunter_id)),
            self.get_ammunition_purchases(Some(hunter_id)),
            self.get_violations(Some(hunter_id)),
            self.get_licenses(Some(hunter_id)),
        )?;

        Ok(HunterDetail {
            shots,
            guns,
            purchases,
            violations,
            license: licenses.into_iter().next(),
        })
    }
}
