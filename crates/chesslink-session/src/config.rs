//! Session configuration: timeouts, queue sizes, and reconnect policy.

use std::time::Duration;

use rand::Rng;
use tracing::warn;

// ---------------------------------------------------------------------------
// ReconnectConfig
// ---------------------------------------------------------------------------

/// Bounded exponential backoff for redialing a dropped channel.
///
/// Attempt `n` (1-based) waits
/// `min(initial_backoff * multiplier^(n-1), max_backoff)` plus a random
/// jitter in `0..=jitter`, then dials. After `max_attempts` failed dials the
/// session gives up and reports [`ConnectionStatus::Lost`](crate::ConnectionStatus::Lost).
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// How many redials to try before giving up. 0 disables reconnection.
    pub max_attempts: u32,
    /// Delay before the first redial.
    pub initial_backoff: Duration,
    /// Upper bound on the delay between redials (jitter excluded).
    pub max_backoff: Duration,
    /// Growth factor between consecutive delays. Must be ≥ 1.0.
    pub multiplier: f64,
    /// Maximum random delay added to every wait, so clients that dropped
    /// together don't all redial at the same instant.
    pub jitter: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: Duration::from_millis(250),
        }
    }
}

impl ReconnectConfig {
    /// A policy that never reconnects: the first drop ends in `Lost`.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// - `multiplier` below 1.0 (or NaN) becomes 1.0.
    /// - `max_backoff` is raised to at least `initial_backoff`.
    pub fn validated(mut self) -> Self {
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            warn!(
                multiplier = self.multiplier,
                "reconnect multiplier below 1.0, clamping"
            );
            self.multiplier = 1.0;
        }
        if self.max_backoff < self.initial_backoff {
            self.max_backoff = self.initial_backoff;
        }
        self
    }

    /// Deterministic part of the delay before redial `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// [`backoff`](Self::backoff) plus random jitter.
    pub fn backoff_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.backoff(attempt);
        let max_us = u64::try_from(self.jitter.as_micros()).unwrap_or(u64::MAX);
        if max_us == 0 {
            return base;
        }
        let us = rand::rng().random_range(0..=max_us);
        base + Duration::from_micros(us)
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for one game channel.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a single dial may take before it counts as failed.
    pub connect_timeout: Duration,
    /// Inbound messages buffered between the connection task and the
    /// consumer. When full, the task stops reading the socket.
    pub inbound_capacity: usize,
    /// Outstanding send/close requests buffered for the connection task.
    pub command_capacity: usize,
    /// What to do when the channel drops.
    pub reconnect: ReconnectConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            inbound_capacity: 64,
            command_capacity: 32,
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by
    /// [`ConnectionManager::connect`](crate::ConnectionManager::connect).
    /// Queue capacities are raised to at least 1 (Tokio channels can't be
    /// zero-sized) and the reconnect policy is validated.
    pub fn validated(mut self) -> Self {
        self.inbound_capacity = self.inbound_capacity.max(1);
        self.command_capacity = self.command_capacity.max(1);
        self.reconnect = self.reconnect.validated();
        self
    }
}
