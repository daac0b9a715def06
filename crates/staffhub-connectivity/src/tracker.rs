//! Connectivity state machine.
//!
//! Pure and synchronous: callers pass the current [`Instant`] in, so the same
//! rules drive both the async monitor and the unit tests.

use serde::Serialize;
use staffhub_core::config::ConnectivityConfig;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::classify::ErrorClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected,
    /// The host reported it went offline.
    Disconnected,
    /// Back online, waiting for a reconnection attempt to succeed.
    Reconnecting,
    /// Repeated network errors; treat the backend as unreachable.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerLevel {
    Info,
    Warning,
    Error,
}

/// User-visible connectivity notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

/// A state change, returned by every mutating call that caused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub block_threshold: u32,
    pub error_window: Duration,
}

impl From<&ConnectivityConfig> for TrackerSettings {
    fn from(cfg: &ConnectivityConfig) -> Self {
        Self {
            block_threshold: cfg.block_threshold.max(1),
            error_window: cfg.error_window(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from(&ConnectivityConfig::default())
    }
}

#[derive(Debug)]
pub struct ConnectivityTracker {
    settings: TrackerSettings,
    state: ConnectionState,
    online: bool,
    network_errors: VecDeque<Instant>,
    last_change: Instant,
}

impl ConnectivityTracker {
    pub fn new(settings: TrackerSettings, now: Instant) -> Self {
        Self {
            settings,
            state: ConnectionState::Connected,
            online: true,
            network_errors: VecDeque::new(),
            last_change: now,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn last_change(&self) -> Instant {
        self.last_change
    }

    /// Network errors currently inside the window.
    pub fn recent_network_errors(&self) -> usize {
        self.network_errors.len()
    }

    /// Reads should come from the cache rather than the backend.
    pub fn should_use_fallback(&self) -> bool {
        self.state != ConnectionState::Connected
    }

    pub fn go_offline(&mut self, now: Instant) -> Option<Transition> {
        self.online = false;
        self.network_errors.clear();
        self.set_state(ConnectionState::Disconnected, now)
    }

    /// Returns a transition to `Reconnecting` when a reconnection attempt is due.
    pub fn go_online(&mut self, now: Instant) -> Option<Transition> {
        self.online = true;
        if self.state == ConnectionState::Connected {
            return None;
        }
        self.set_state(ConnectionState::Reconnecting, now)
    }

    pub fn record_error(&mut self, class: ErrorClass, now: Instant) -> Option<Transition> {
        if class != ErrorClass::Network || !self.online {
            return None;
        }
        self.network_errors.push_back(now);
        self.prune(now);
        if self.network_errors.len() >= self.settings.block_threshold as usize {
            self.set_state(ConnectionState::Blocked, now)
        } else {
            None
        }
    }

    /// A backend call succeeded, so the backend is reachable.
    pub fn record_success(&mut self, now: Instant) -> Option<Transition> {
        self.online = true;
        self.network_errors.clear();
        self.set_state(ConnectionState::Connected, now)
    }

    /// A reconnection attempt is starting.
    pub fn begin_reconnect(&mut self, now: Instant) -> Option<Transition> {
        if !self.online || self.state == ConnectionState::Connected {
            return None;
        }
        self.set_state(ConnectionState::Reconnecting, now)
    }

    /// Reconnection attempts were exhausted.
    pub fn mark_blocked(&mut self, now: Instant) -> Option<Transition> {
        if !self.online {
            return None;
        }
        self.set_state(ConnectionState::Blocked, now)
    }

    pub fn banner(&self) -> Option<Banner> {
        let (level, message) = match self.state {
            ConnectionState::Connected => return None,
            ConnectionState::Disconnected => (
                BannerLevel::Warning,
                "You are offline. Showing cached data; changes will sync when the connection returns.",
            ),
            ConnectionState::Reconnecting => (BannerLevel::Info, "Reconnecting to the server..."),
            ConnectionState::Blocked => (
                BannerLevel::Error,
                "Cannot reach the server. Showing cached data until the connection recovers.",
            ),
        };
        Some(Banner { level, message: message.to_string() })
    }

    fn prune(&mut self, now: Instant) {
        let window = self.settings.error_window;
        while let Some(&oldest) = self.network_errors.front() {
            if now.saturating_duration_since(oldest) > window {
                self.network_errors.pop_front();
            } else {
                break;
            }
        }
    }

    fn set_state(&mut self, to: ConnectionState, now: Instant) -> Option<Transition> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        self.last_change = now;
        Some(Transition { from, to })
    }
}
