use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::models::{
    Activity, Ammunition, AmmunitionPurchase, DashboardStats, Gun, Hunter, HuntingZone, License,
    Shot, Violation,
};
use crate::reconciler::ShotWindow;

/// How many of each secondary collection the dashboard retains for display.
pub const ACTIVITY_DISPLAY_LIMIT: usize = 10;
pub const VIOLATION_DISPLAY_LIMIT: usize = 20;
pub const PURCHASE_DISPLAY_LIMIT: usize = 20;

/// Every collection the dashboard holds, owned in one place. Mutation is
/// whole-collection replacement (or the shot window's merge), never partial
/// in-place edits, so render snapshots are always internally consistent.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub hunters: Vec<Hunter>,
    pub guns: Vec<Gun>,
    pub shots: ShotWindow,
    pub ammunition: Vec<Ammunition>,
    pub activities: Vec<Activity>,
    pub violations: Vec<Violation>,
    pub zones: Vec<HuntingZone>,
    pub licenses: Vec<License>,
    pub purchases: Vec<AmmunitionPurchase>,
}

impl DashboardData {
    pub fn new(shot_window_cap: usize) -> Self {
        Self {
            stats: DashboardStats::default(),
            hunters: Vec::new(),
            guns: Vec::new(),
            shots: ShotWindow::new(shot_window_cap),
            ammunition: Vec::new(),
            activities: Vec::new(),
            violations: Vec::new(),
            zones: Vec::new(),
            licenses: Vec::new(),
            purchases: Vec::new(),
        }
    }
}

/// The initial joint load: all collections fetched together, published in one
/// replacement so a partially-loaded dashboard is never visible.
#[derive(Debug, Clone, Default)]
pub struct InitialLoad {
    pub stats: DashboardStats,
    pub hunters: Vec<Hunter>,
    pub guns: Vec<Gun>,
    pub shots: Vec<Shot>,
    pub ammunition: Vec<Ammunition>,
    pub activities: Vec<Activity>,
    pub violations: Vec<Violation>,
    pub zones: Vec<HuntingZone>,
    pub licenses: Vec<License>,
    pub purchases: Vec<AmmunitionPurchase>,
}

/// Single owner of the dashboard state. Readers take snapshots; writers go
/// through the replacement methods, each of which bumps a watch-channel
/// generation counter so views can redraw on change instead of watching
/// ambient globals.
#[derive(Clone)]
pub struct Store {
    data: Arc<RwLock<DashboardData>>,
    generation: Arc<watch::Sender<u64>>,
}

impl Store {
    pub fn new(shot_window_cap: usize) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            data: Arc::new(RwLock::new(DashboardData::new(shot_window_cap))),
            generation: Arc::new(tx),
        }
    }

    /// Change notifications: the receiver wakes whenever any replacement
    /// lands, carrying a monotonically increasing generation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    fn notify(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    pub async fn snapshot(&self) -> DashboardData {
        self.data.read().await.clone()
    }

    pub async fn replace_all(&self, load: InitialLoad) {
        {
            let mut data = self.data.write().await;
            data.stats = load.stats;
            data.hunters = load.hunters;
            data.guns = load.guns;
            data.shots.reset(load.shots);
            data.ammunition = load.ammunition;
            data.activities = truncated(load.activities, ACTIVITY_DISPLAY_LIMIT);
            data.violations = truncated(load.violations, VIOLATION_DISPLAY_LIMIT);
            data.zones = load.zones;
            data.licenses = load.licenses;
            data.purchases = truncated(load.purchases, PURCHASE_DISPLAY_LIMIT);
        }
        self.notify();
    }

    pub async fn replace_stats(&self, stats: DashboardStats) {
        self.data.write().await.stats = stats;
        self.notify();
    }

    pub async fn replace_hunters(&self, hunters: Vec<Hunter>) {
        self.data.write().await.hunters = hunters;
        self.notify();
    }

    pub async fn replace_guns(&self, guns: Vec<Gun>) {
        self.data.write().await.guns = guns;
        self.notify();
    }

    pub async fn replace_ammunition(&self, ammunition: Vec<Ammunition>) {
        self.data.write().await.ammunition = ammunition;
        self.notify();
    }

    pub async fn replace_shots(&self, shots: Vec<Shot>) {
        self.data.write().await.shots.reset(shots);
        self.notify();
    }

    /// Merges a freshly polled page into the shot window; returns the ids of
    /// the truly-new records so the caller can schedule highlight expiry.
    pub async fn merge_shots(&self, fetched: Vec<Shot>) -> Vec<i64> {
        let new_ids = self.data.write().await.shots.merge(fetched);
        if !new_ids.is_empty() {
            self.notify();
        }
        new_ids
    }

    /// Drops the highlight flag for the given ids. Cosmetic only; membership
    /// and ordering of the window are untouched.
    pub async fn expire_highlights(&self, ids: &[i64]) {
        let changed = self.data.write().await.shots.clear_fresh(ids);
        if changed {
            self.notify();
        }
    }

    /// Offline placeholder content shown when initialization gives up.
    pub async fn load_offline_placeholder(&self) {
        {
            let mut data = self.data.write().await;
            *data = DashboardData::new(data.shots.cap());
        }
        self.notify();
    }
}

fn truncated<T>(mut records: Vec<T>, limit: usize) -> Vec<T> {
    records.truncate(limit);
    records
}
