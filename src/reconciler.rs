use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::HuntwatchClient;
use crate::config::Config;
use crate::connection::ConnectionState;
use crate::models::Shot;
use crate::store::Store;

// ===== SHOT WINDOW =====

/// Capped, newest-first window of shot events. Records merge by identity, so
/// re-applying an overlapping fetch is a no-op, and ids that arrived in the
/// latest merges stay marked fresh until their highlight expires.
#[derive(Debug, Clone)]
pub struct ShotWindow {
    shots: Vec<Shot>,
    fresh: HashSet<i64>,
    cap: usize,
}

impl ShotWindow {
    pub fn new(cap: usize) -> Self {
        Self {
            shots: Vec::new(),
            fresh: HashSet::new(),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn is_fresh(&self, id: i64) -> bool {
        self.fresh.contains(&id)
    }

    /// Replaces the whole window, e.g. from an initial load. Nothing is
    /// highlighted afterwards.
    pub fn reset(&mut self, mut shots: Vec<Shot>) {
        shots.truncate(self.cap);
        self.shots = shots;
        self.fresh.clear();
    }

    /// Merges a newest-first fetch into the window. Records whose id is
    /// already present are dropped; truly-new ones are prepended in fetch
    /// order, the window is re-capped, and the new ids are returned (also
    /// marked fresh). Records without an id cannot be de-duplicated and are
    /// ignored.
    pub fn merge(&mut self, fetched: Vec<Shot>) -> Vec<i64> {
        let mut known: HashSet<i64> = self.shots.iter().filter_map(|s| s.id).collect();
        let mut incoming: Vec<Shot> = Vec::new();
        for shot in fetched {
            // Inserting as we go also drops repeats within the fetched page
            // itself; the id is the sole de-duplication key.
            let Some(id) = shot.id else { continue };
            if known.insert(id) {
                incoming.push(shot);
            }
        }
        if incoming.is_empty() {
            return Vec::new();
        }

        let new_ids: Vec<i64> = incoming.iter().filter_map(|s| s.id).collect();
        self.fresh.extend(new_ids.iter().copied());

        let mut merged = incoming;
        merged.append(&mut self.shots);
        merged.truncate(self.cap);
        self.shots = merged;
        self.fresh.retain(|id| self.shots.iter().any(|s| s.id == Some(*id)));

        new_ids
    }

    /// Clears the fresh mark from the given ids; returns whether any mark
    /// was actually removed.
    pub fn clear_fresh(&mut self, ids: &[i64]) -> bool {
        let before = self.fresh.len();
        for id in ids {
            self.fresh.remove(id);
        }
        self.fresh.len() != before
    }
}

// ===== POLL LOOP =====

/// Periodic reconciliation against the backend: while connected, fetches the
/// most recent shots every poll interval, merges them into the window, and
/// refreshes the aggregate stats whenever the merge brought something new.
/// Cycles run strictly one at a time; a slow fetch skips ticks instead of
/// stacking cycles.
pub struct PollReconciler {
    client: HuntwatchClient,
    store: Store,
    status: watch::Receiver<ConnectionState>,
    poll_interval: Duration,
    page_size: u32,
    highlight_ttl: Duration,
    cancel: CancellationToken,
}

impl PollReconciler {
    pub fn new(
        client: HuntwatchClient,
        store: Store,
        status: watch::Receiver<ConnectionState>,
        config: &Config,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            store,
            status,
            poll_interval: config.poll_interval,
            page_size: config.poll_page_size,
            highlight_ttl: config.highlight_ttl,
            cancel,
        }
    }

    pub async fn run(self) {
        let this = &self;
        run_serialized(this.poll_interval, this.cancel.clone(), || async {
            if *this.status.borrow() != ConnectionState::Connected {
                return;
            }
            this.poll_once().await;
        })
        .await;
    }

    /// One reconciliation cycle. Fetch failures are logged and swallowed so
    /// the previous window stays on screen until the next cycle.
    async fn poll_once(&self) {
        let fetched = match self.client.get_recent_shots(self.page_size).await {
            Ok(shots) => shots,
            Err(e) => {
                warn!(error = %e, "shot poll failed, keeping current window");
                return;
            }
        };

        let new_ids = self.store.merge_shots(fetched).await;
        if new_ids.is_empty() {
            return;
        }
        debug!(count = new_ids.len(), "merged new shots");

        self.spawn_highlight_expiry(new_ids);

        // New shots shift the aggregates, so re-read them from the backend
        // rather than guessing at the deltas locally.
        match self.client.get_dashboard_stats().await {
            Ok(stats) => self.store.replace_stats(stats).await,
            Err(e) => warn!(error = %e, "stats refresh failed"),
        }
    }

    fn spawn_highlight_expiry(&self, ids: Vec<i64>) {
        let store = self.store.clone();
        let cancel = self.cancel.clone();
        let ttl = self.highlight_ttl;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(ttl) => store.expire_highlights(&ids).await,
            }
        });
    }
}

/// Drives `cycle` on a fixed interval, strictly one at a time: the next tick
/// is awaited only after the previous cycle finishes, and ticks that elapsed
/// while it ran are skipped rather than fired in a burst.
pub async fn run_serialized<F, Fut>(period: Duration, cancel: CancellationToken, mut cycle: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        cycle().await;
    }
}
