use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::client::{ApiError, ApiResult, HuntwatchClient};
use crate::config::Config;
use crate::store::{InitialLoad, Store};

// ===== STATE MACHINE =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    /// `offline` marks the terminal sub-state entered when the bounded retry
    /// sequence is exhausted; only a manual retry leaves it.
    Disconnected { offline: bool },
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "Connecting..."),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Disconnected { offline: false } => write!(f, "Disconnected"),
            ConnectionState::Disconnected { offline: true } => write!(f, "Offline mode"),
        }
    }
}

/// What the initialization driver should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

/// Pure connection-status state machine. The async `Supervisor` drives it;
/// keeping transitions here makes the retry policy testable without a
/// network in sight.
#[derive(Debug)]
pub struct ConnectionTracker {
    state: ConnectionState,
    attempts: u32,
    max_attempts: u32,
    retry_delay: Duration,
}

impl ConnectionTracker {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Connecting,
            attempts: 0,
            max_attempts,
            retry_delay,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.state, ConnectionState::Disconnected { offline: true })
    }

    /// An initialization attempt is starting.
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
        self.state = ConnectionState::Connecting;
    }

    /// The initial batch fetch succeeded in full.
    pub fn record_success(&mut self) {
        self.attempts = 0;
        self.state = ConnectionState::Connected;
    }

    /// An initialization attempt failed. Once the attempt count reaches the
    /// bound the tracker parks itself offline and stops automatic retries.
    pub fn record_failure(&mut self) -> RetryDecision {
        if self.attempts >= self.max_attempts {
            self.state = ConnectionState::Disconnected { offline: true };
            RetryDecision::GiveUp
        } else {
            self.state = ConnectionState::Disconnected { offline: false };
            RetryDecision::RetryAfter(self.retry_delay)
        }
    }

    /// User-driven retry: resets the attempt counter and re-enters
    /// `Connecting`, including from the terminal offline sub-state.
    pub fn manual_retry(&mut self) {
        self.attempts = 0;
        self.state = ConnectionState::Connecting;
    }

    /// Outcome of the background health probe. Flips the badge between
    /// `Connected` and `Disconnected` without touching the retry counter;
    /// never disturbs an in-flight initialization or the offline sub-state.
    pub fn probe_result(&mut self, reachable: bool) {
        match (self.state, reachable) {
            (ConnectionState::Connected, false) => {
                self.state = ConnectionState::Disconnected { offline: false };
            }
            (ConnectionState::Disconnected { offline: false }, true) => {
                self.state = ConnectionState::Connected;
            }
            _ => {}
        }
    }
}

// ===== ASYNC DRIVER =====

/// Owns the single initialization sequence, the connection tracker, and the
/// background health probe. Status changes are published over a watch
/// channel for the badge and the reconciler gate.
pub struct Supervisor {
    client: HuntwatchClient,
    store: Store,
    tracker: Mutex<ConnectionTracker>,
    status_tx: watch::Sender<ConnectionState>,
    initializing: AtomicBool,
    health_interval: Duration,
    cancel: CancellationToken,
}

impl Supervisor {
    pub fn new(
        client: HuntwatchClient,
        store: Store,
        config: &Config,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let tracker = ConnectionTracker::new(config.max_connection_attempts, config.retry_delay);
        let (status_tx, _) = watch::channel(tracker.state());
        Arc::new(Self {
            client,
            store,
            tracker: Mutex::new(tracker),
            status_tx,
            initializing: AtomicBool::new(false),
            health_interval: config.health_interval,
            cancel,
        })
    }

    pub fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status_tx.subscribe()
    }

    fn publish(&self) {
        let state = self.tracker.lock().expect("tracker lock poisoned").state();
        self.status_tx.send_replace(state);
    }

    /// Runs the bounded-retry initialization sequence. Re-entrant calls while
    /// one is outstanding are a no-op. On exhaustion the store switches to
    /// offline placeholder content and `ExhaustedRetries` is returned.
    pub async fn initialize(self: &Arc<Self>) -> ApiResult<()> {
        if self.initializing.swap(true, Ordering::SeqCst) {
            info!("initialization already in progress");
            return Ok(());
        }

        let result = self.run_initialization().await;
        self.initializing.store(false, Ordering::SeqCst);
        result
    }

    async fn run_initialization(self: &Arc<Self>) -> ApiResult<()> {
        loop {
            let attempt = {
                let mut tracker = self.tracker.lock().expect("tracker lock poisoned");
                tracker.begin_attempt();
                tracker.attempts()
            };
            self.publish();
            info!(attempt, "initializing dashboard data");

            match self.fetch_initial().await {
                Ok(load) => {
                    self.store.replace_all(load).await;
                    self.tracker
                        .lock()
                        .expect("tracker lock poisoned")
                        .record_success();
                    self.publish();
                    info!("connected to backend");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt, error = %e, "initialization fetch failed");
                    let decision = self
                        .tracker
                        .lock()
                        .expect("tracker lock poisoned")
                        .record_failure();
                    self.publish();

                    match decision {
                        RetryDecision::RetryAfter(delay) => {
                            tokio::select! {
                                _ = self.cancel.cancelled() => return Ok(()),
                                _ = sleep(delay) => {}
                            }
                        }
                        RetryDecision::GiveUp => {
                            warn!("backend unreachable; entering offline mode");
                            self.store.load_offline_placeholder().await;
                            return Err(ApiError::ExhaustedRetries { attempts: attempt });
                        }
                    }
                }
            }
        }
    }

    /// Manual retry action from the UI: resets the attempt counter and runs
    /// a fresh initialization sequence (unless one is already in flight).
    pub async fn manual_retry(self: &Arc<Self>) -> ApiResult<()> {
        if self.initializing.load(Ordering::SeqCst) {
            info!("connection attempt already in progress");
            return Ok(());
        }
        self.tracker
            .lock()
            .expect("tracker lock poisoned")
            .manual_retry();
        self.publish();
        self.initialize().await
    }

    /// Joint fetch of every collection; the UI is updated only after all of
    /// them settle, so a half-loaded batch is never visible.
    async fn fetch_initial(&self) -> ApiResult<InitialLoad> {
        let (stats, hunters, guns, shots, ammunition, activities) = tokio::try_join!(
            self.client.get_dashboard_stats(),
            self.client.get_hunters(),
            self.client.get_guns(None),
            self.client.get_shots(None, None),
            self.client.get_ammunition(),
            self.client.get_activities(),
        )?;
        let (violations, zones, licenses, purchases) = tokio::try_join!(
            self.client.get_violations(None),
            self.client.get_hunting_zones(),
            self.client.get_licenses(None),
            self.client.get_ammunition_purchases(None),
        )?;

        Ok(InitialLoad {
            stats,
            hunters,
            guns,
            shots,
            ammunition,
            activities,
            violations,
            zones,
            licenses,
            purchases,
        })
    }

    /// Background reachability probe, independent of data polling and of the
    /// retry counter. Badge-only: it never re-enters initialization.
    pub async fn run_health_probe(self: Arc<Self>) {
        let mut ticker = interval(self.health_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if self.initializing.load(Ordering::SeqCst) {
                continue;
            }

            let reachable = self.client.ping().await;
            self.tracker
                .lock()
                .expect("tracker lock poisoned")
                .probe_result(reachable);
            self.publish();
        }
    }
}
