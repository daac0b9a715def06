//! Async connectivity monitor.
//!
//! Wraps a [`ConnectivityTracker`] in shared state, publishes every change on a
//! `watch` channel and drives debounced reconnection attempts against a
//! [`ConnectivityProbe`].

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use staffhub_core::config::ConnectivityConfig;
use staffhub_core::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::classify::{ErrorClass, classify_error};
use crate::tracker::{Banner, ConnectionState, ConnectivityTracker, TrackerSettings, Transition};

/// Cheap backend reachability check used when reconnecting.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

/// What listeners observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivitySnapshot {
    pub state: ConnectionState,
    pub online: bool,
    pub banner: Option<Banner>,
    pub recent_network_errors: usize,
    pub reconnect_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct ReconnectSettings {
    pub debounce: Duration,
    pub max_attempts: u32,
    pub max_delay: Duration,
}

impl From<&ConnectivityConfig> for ReconnectSettings {
    fn from(cfg: &ConnectivityConfig) -> Self {
        Self {
            debounce: cfg.reconnect_debounce(),
            max_attempts: cfg.max_reconnect_attempts.max(1),
            max_delay: cfg.max_reconnect_delay(),
        }
    }
}

struct Inner {
    tracker: ConnectivityTracker,
    reconnect_attempts: u32,
}

struct Shared {
    inner: Mutex<Inner>,
    tx: watch::Sender<ConnectivitySnapshot>,
    probe: Option<Arc<dyn ConnectivityProbe>>,
    reconnect: ReconnectSettings,
    /// Bumped on every scheduled reconnect; older tasks see a stale value and exit.
    generation: AtomicU64,
}

/// Shared handle; clones observe and drive the same state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    shared: Arc<Shared>,
}

impl ConnectivityMonitor {
    pub fn new(config: &ConnectivityConfig, probe: Option<Arc<dyn ConnectivityProbe>>) -> Self {
        let tracker = ConnectivityTracker::new(TrackerSettings::from(config), Instant::now());
        let inner = Inner { tracker, reconnect_attempts: 0 };
        let (tx, _) = watch::channel(snapshot_of(&inner));
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                tx,
                probe,
                reconnect: ReconnectSettings::from(config),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Listen for state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivitySnapshot> {
        self.shared.tx.subscribe()
    }

    pub fn snapshot(&self) -> ConnectivitySnapshot {
        snapshot_of(&self.lock())
    }

    pub fn state(&self) -> ConnectionState {
        self.lock().tracker.state()
    }

    pub fn should_use_fallback(&self) -> bool {
        self.lock().tracker.should_use_fallback()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.lock().tracker.banner()
    }

    pub fn go_offline(&self) {
        // Cancel any in-flight reconnect loop.
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.mutate(|t, now| t.go_offline(now));
    }

    pub fn go_online(&self) {
        if self.mutate(|t, now| t.go_online(now)).is_some() {
            self.schedule_reconnect();
        }
    }

    pub fn record_error(&self, class: ErrorClass) {
        let transition = self.mutate(|t, now| t.record_error(class, now));
        if matches!(transition, Some(Transition { to: ConnectionState::Blocked, .. })) {
            self.schedule_reconnect();
        }
    }

    pub fn record_success(&self) {
        self.mutate(|t, now| t.record_success(now));
    }

    /// Feed a backend result into the monitor without consuming it.
    pub fn observe<T>(&self, result: &Result<T>) {
        match result {
            Ok(_) => self.record_success(),
            Err(e) => self.record_error(classify_error(e)),
        }
    }

    /// Feed a backend result into the monitor and hand it back.
    pub fn guard<T>(&self, result: Result<T>) -> Result<T> {
        self.observe(&result);
        result
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mutate<F>(&self, f: F) -> Option<Transition>
    where
        F: FnOnce(&mut ConnectivityTracker, Instant) -> Option<Transition>,
    {
        let mut inner = self.lock();
        let transition = f(&mut inner.tracker, Instant::now());
        if let Some(tr) = transition {
            if tr.to == ConnectionState::Connected {
                inner.reconnect_attempts = 0;
            }
            log_transition(tr);
            self.shared.tx.send_replace(snapshot_of(&inner));
        }
        transition
    }

    fn schedule_reconnect(&self) {
        let Some(probe) = self.shared.probe.clone() else {
            tracing::debug!("No connectivity probe configured; waiting for the next backend success");
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; skipping reconnection attempt");
            return;
        };
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let monitor = self.clone();
        handle.spawn(async move {
            monitor.reconnect_loop(probe, generation).await;
        });
    }

    fn is_current(&self, generation: u64) -> bool {
        self.shared.generation.load(Ordering::SeqCst) == generation
    }

    /// Probe with backoff up to `max_attempts`, then mark the backend blocked
    /// and keep probing every `max_delay` until it answers, the host goes
    /// offline, or a newer reconnect supersedes this one.
    async fn reconnect_loop(&self, probe: Arc<dyn ConnectivityProbe>, generation: u64) {
        tokio::time::sleep(self.shared.reconnect.debounce).await;

        let max_attempts = self.shared.reconnect.max_attempts;
        let mut attempt = 0u32;
        loop {
            if !self.is_current(generation) {
                return;
            }
            let retrying = attempt < max_attempts;
            {
                let mut inner = self.lock();
                if !inner.tracker.is_online() || inner.tracker.state() == ConnectionState::Connected {
                    return;
                }
                if retrying {
                    attempt += 1;
                    inner.reconnect_attempts = attempt;
                }
            }
            if retrying {
                self.mutate(|t, now| t.begin_reconnect(now));
                tracing::info!("Reconnection attempt {attempt}/{max_attempts}");
            }

            match probe.ping().await {
                Ok(()) => {
                    if self.is_current(generation) {
                        self.record_success();
                        tracing::info!("Backend reachable again");
                    }
                    return;
                }
                Err(e) if retrying => tracing::warn!("Reconnection attempt {attempt} failed: {e}"),
                Err(e) => tracing::debug!("Backend still unreachable: {e}"),
            }

            if retrying && attempt >= max_attempts && self.is_current(generation) {
                self.mutate(|t, now| t.mark_blocked(now));
                tracing::error!(
                    "Giving up after {attempt} reconnection attempts; probing every {:?}",
                    self.shared.reconnect.max_delay
                );
            }
            let delay = if attempt < max_attempts {
                backoff_delay(&self.shared.reconnect, attempt)
            } else {
                self.shared.reconnect.max_delay
            };
            tokio::time::sleep(delay).await;
        }
    }
}

/// Exponential backoff from the debounce interval, capped, with up to 10% jitter.
pub fn backoff_delay(settings: &ReconnectSettings, attempt: u32) -> Duration {
    let base = settings.debounce.max(Duration::from_millis(1));
    let factor = 2u32.saturating_pow(attempt.min(16));
    let delay = base.saturating_mul(factor).min(settings.max_delay);
    let jitter_ms = (delay.as_millis() as u64) / 10;
    let jitter = if jitter_ms > 0 { rand::thread_rng().gen_range(0..=jitter_ms) } else { 0 };
    delay + Duration::from_millis(jitter)
}

fn snapshot_of(inner: &Inner) -> ConnectivitySnapshot {
    ConnectivitySnapshot {
        state: inner.tracker.state(),
        online: inner.tracker.is_online(),
        banner: inner.tracker.banner(),
        recent_network_errors: inner.tracker.recent_network_errors(),
        reconnect_attempts: inner.reconnect_attempts,
    }
}

fn log_transition(tr: Transition) {
    match tr.to {
        ConnectionState::Connected => tracing::info!("🟢 Connectivity {:?} -> {:?}", tr.from, tr.to),
        ConnectionState::Reconnecting => tracing::info!("🟡 Connectivity {:?} -> {:?}", tr.from, tr.to),
        ConnectionState::Disconnected | ConnectionState::Blocked => {
            tracing::warn!("🔴 Connectivity {:?} -> {:?}", tr.from, tr.to)
        }
    }
}
